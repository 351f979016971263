//! Dashboard Widget Types

use serde::{Deserialize, Serialize};

/// アラームウィジェット
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmWidget {
    /// ウィジェットタイトル
    pub title: String,
    /// 表示するアラームの参照
    pub alarm: String,
    /// 幅（グリッド単位）
    pub width: u32,
    /// 高さ（グリッド単位）
    pub height: u32,
}

impl AlarmWidget {
    /// 新しいウィジェットを作成
    pub fn new(title: impl Into<String>, alarm: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            alarm: alarm.into(),
            width: 6,
            height: 6,
        }
    }

    /// サイズを設定
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// CloudWatch dashboard body entry for this widget.
    pub fn to_body(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "metric",
            "width": self.width,
            "height": self.height,
            "properties": {
                "view": "timeSeries",
                "title": self.title,
                "annotations": { "alarms": [self.alarm] },
                "yAxis": {},
            },
        })
    }
}
