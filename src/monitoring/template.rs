//! In-memory resource template
//!
//! A [`MonitoringPort`] that collects everything into a CloudFormation-style
//! `Resources` document instead of provisioning it.

use super::dashboard::{AlarmWidget, DashboardConfig};
use super::port::MonitoringPort;
use crate::alarms::AlarmDefinition;
use crate::error::{Error, Result};
use serde::ser::{Error as _, SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

pub const TOPIC_LOGICAL_ID: &str = "AlarmTopic";
pub const SUBSCRIPTION_LOGICAL_ID: &str = "AlarmTopicEmailSubscription";
pub const DASHBOARD_LOGICAL_ID: &str = "MonitoringDashboard";

pub const TOPIC_TYPE: &str = "AWS::SNS::Topic";
pub const SUBSCRIPTION_TYPE: &str = "AWS::SNS::Subscription";
pub const ALARM_TYPE: &str = "AWS::CloudWatch::Alarm";
pub const DASHBOARD_TYPE: &str = "AWS::CloudWatch::Dashboard";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TopicProperties {
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubscriptionProperties {
    pub protocol: String,
    pub endpoint: String,
    pub topic_arn: String,
}

/// Collected monitoring resources.
#[derive(Debug, Clone, Default)]
pub struct MonitoringTemplate {
    topic: Option<TopicProperties>,
    subscription: Option<SubscriptionProperties>,
    dashboard: Option<DashboardConfig>,
    alarms: Vec<(String, AlarmDefinition)>,
}

impl MonitoringTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topic(&self) -> Option<&TopicProperties> {
        self.topic.as_ref()
    }

    pub fn subscription(&self) -> Option<&SubscriptionProperties> {
        self.subscription.as_ref()
    }

    pub fn dashboard(&self) -> Option<&DashboardConfig> {
        self.dashboard.as_ref()
    }

    /// Alarms in the order they were recorded.
    pub fn alarms(&self) -> impl Iterator<Item = &AlarmDefinition> {
        self.alarms.iter().map(|(_, def)| def)
    }

    pub fn alarm(&self, logical_id: &str) -> Option<&AlarmDefinition> {
        self.alarms
            .iter()
            .find(|(id, _)| id == logical_id)
            .map(|(_, def)| def)
    }

    /// Number of resources of a CloudFormation type, e.g. `AWS::CloudWatch::Alarm`.
    pub fn resource_count(&self, resource_type: &str) -> usize {
        match resource_type {
            TOPIC_TYPE => usize::from(self.topic.is_some()),
            SUBSCRIPTION_TYPE => usize::from(self.subscription.is_some()),
            DASHBOARD_TYPE => usize::from(self.dashboard.is_some()),
            ALARM_TYPE => self.alarms.len(),
            _ => 0,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    fn contains(&self, logical_id: &str) -> bool {
        (self.topic.is_some() && logical_id == TOPIC_LOGICAL_ID)
            || (self.subscription.is_some() && logical_id == SUBSCRIPTION_LOGICAL_ID)
            || (self.dashboard.is_some() && logical_id == DASHBOARD_LOGICAL_ID)
            || self.alarms.iter().any(|(id, _)| id == logical_id)
    }
}

impl MonitoringPort for MonitoringTemplate {
    fn create_alarm_topic(&mut self, display_name: &str, email: Option<&str>) -> Result<String> {
        if self.topic.is_some() {
            return Err(Error::DuplicateResource(TOPIC_LOGICAL_ID.to_string()));
        }

        let topic_ref = reference(TOPIC_LOGICAL_ID);
        self.topic = Some(TopicProperties {
            display_name: display_name.to_string(),
        });
        self.subscription = email.map(|address| SubscriptionProperties {
            protocol: "email".to_string(),
            endpoint: address.to_string(),
            topic_arn: topic_ref.clone(),
        });

        Ok(topic_ref)
    }

    fn create_dashboard(&mut self, name: &str) -> Result<()> {
        if self.dashboard.is_some() {
            return Err(Error::DuplicateResource(DASHBOARD_LOGICAL_ID.to_string()));
        }
        self.dashboard = Some(DashboardConfig::new(name));
        Ok(())
    }

    fn record_alarm_definition(
        &mut self,
        logical_id: &str,
        definition: AlarmDefinition,
    ) -> Result<String> {
        if self.contains(logical_id) {
            return Err(Error::DuplicateResource(logical_id.to_string()));
        }
        self.alarms.push((logical_id.to_string(), definition));
        Ok(attribute(logical_id, "Arn"))
    }

    fn add_alarm_widget(&mut self, widget: AlarmWidget) -> Result<()> {
        let dashboard = self
            .dashboard
            .as_mut()
            .ok_or_else(|| Error::ResourceNotFound(DASHBOARD_LOGICAL_ID.to_string()))?;
        dashboard.add_widget(widget);
        Ok(())
    }
}

/// `${LogicalId}` reference token.
fn reference(logical_id: &str) -> String {
    format!("${{{logical_id}}}")
}

fn attribute(logical_id: &str, name: &str) -> String {
    format!("${{{logical_id}.{name}}}")
}

struct Typed<'a, P: Serialize> {
    resource_type: &'a str,
    properties: P,
}

impl<P: Serialize> Serialize for Typed<'_, P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Resource", 2)?;
        state.serialize_field("Type", self.resource_type)?;
        state.serialize_field("Properties", &self.properties)?;
        state.end()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DashboardProperties<'a> {
    dashboard_name: &'a str,
    dashboard_body: String,
}

struct Resources<'a>(&'a MonitoringTemplate);

impl Serialize for Resources<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let template = self.0;
        let mut map = serializer.serialize_map(None)?;

        if let Some(topic) = &template.topic {
            map.serialize_entry(
                TOPIC_LOGICAL_ID,
                &Typed {
                    resource_type: TOPIC_TYPE,
                    properties: topic,
                },
            )?;
        }
        if let Some(subscription) = &template.subscription {
            map.serialize_entry(
                SUBSCRIPTION_LOGICAL_ID,
                &Typed {
                    resource_type: SUBSCRIPTION_TYPE,
                    properties: subscription,
                },
            )?;
        }
        if let Some(dashboard) = &template.dashboard {
            let dashboard_body = dashboard.body().map_err(S::Error::custom)?;
            map.serialize_entry(
                DASHBOARD_LOGICAL_ID,
                &Typed {
                    resource_type: DASHBOARD_TYPE,
                    properties: DashboardProperties {
                        dashboard_name: &dashboard.name,
                        dashboard_body,
                    },
                },
            )?;
        }
        for (logical_id, definition) in &template.alarms {
            map.serialize_entry(
                logical_id,
                &Typed {
                    resource_type: ALARM_TYPE,
                    properties: definition,
                },
            )?;
        }

        map.end()
    }
}

impl Serialize for MonitoringTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Template", 1)?;
        state.serialize_field("Resources", &Resources(self))?;
        state.end()
    }
}
