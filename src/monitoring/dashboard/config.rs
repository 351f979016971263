//! Dashboard Configuration

use super::widget::AlarmWidget;
use serde::{Deserialize, Serialize};

/// ダッシュボード設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// ダッシュボード名
    pub name: String,
    /// ウィジェットリスト
    pub widgets: Vec<AlarmWidget>,
}

impl DashboardConfig {
    /// 新しいダッシュボード設定を作成
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            widgets: Vec::new(),
        }
    }

    /// ウィジェットを追加
    pub fn add_widget(&mut self, widget: AlarmWidget) {
        self.widgets.push(widget);
    }

    /// `DashboardBody` JSON document, widgets stacked in insertion order.
    pub fn body(&self) -> serde_json::Result<String> {
        let mut y: u64 = 0;
        let widgets: Vec<_> = self
            .widgets
            .iter()
            .map(|widget| {
                let mut body = widget.to_body();
                body["x"] = serde_json::json!(0);
                body["y"] = serde_json::json!(y);
                y += u64::from(widget.height);
                body
            })
            .collect();
        serde_json::to_string(&serde_json::json!({ "widgets": widgets }))
    }
}
