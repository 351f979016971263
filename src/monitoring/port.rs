//! Infrastructure port
//!
//! The alarm pipeline never provisions anything itself. Whatever turns
//! alarm definitions into real resources implements [`MonitoringPort`].

use crate::alarms::AlarmDefinition;
use crate::error::Result;
use crate::monitoring::dashboard::AlarmWidget;

/// 監視リソースの作成先
pub trait MonitoringPort {
    /// Creates the notification topic and returns a reference usable as an
    /// alarm action. Subscribes `email` when given.
    fn create_alarm_topic(&mut self, display_name: &str, email: Option<&str>) -> Result<String>;

    /// Creates the dashboard that alarm widgets are added to.
    fn create_dashboard(&mut self, name: &str) -> Result<()>;

    /// Records one alarm and returns a reference to it.
    fn record_alarm_definition(
        &mut self,
        logical_id: &str,
        definition: AlarmDefinition,
    ) -> Result<String>;

    fn add_alarm_widget(&mut self, widget: AlarmWidget) -> Result<()>;
}
