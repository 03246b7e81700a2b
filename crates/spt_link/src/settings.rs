use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Broker connection parameters. Defaults match the shop-floor deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSettings {
    pub broker_host: String,
    pub broker_port: u16,
    pub client_id: String,
    pub keep_alive: Duration,
    pub credentials: Option<Credentials>,
    /// Outgoing requests buffered before `publish` starts failing.
    pub request_capacity: usize,
    pub reconnect_delay: Duration,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            broker_host: "192.168.1.228".to_string(),
            broker_port: 1883,
            client_id: format!("spt-console-{}", std::process::id()),
            keep_alive: Duration::from_secs(60),
            credentials: None,
            request_capacity: 10,
            reconnect_delay: Duration::from_secs(2),
        }
    }
}

impl LinkSettings {
    pub(crate) fn mqtt_options(&self) -> rumqttc::MqttOptions {
        let mut options =
            rumqttc::MqttOptions::new(&self.client_id, &self.broker_host, self.broker_port);
        options.set_keep_alive(self.keep_alive);
        if let Some(credentials) = &self.credentials {
            options.set_credentials(&credentials.username, &credentials.password);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_carry_broker_address() {
        let settings = LinkSettings {
            broker_host: "broker.local".to_string(),
            broker_port: 1884,
            client_id: "bench-1".to_string(),
            credentials: Some(Credentials {
                username: "op".to_string(),
                password: "secret".to_string(),
            }),
            ..LinkSettings::default()
        };
        let options = settings.mqtt_options();
        assert_eq!(
            options.broker_address(),
            ("broker.local".to_string(), 1884)
        );
        assert_eq!(options.client_id(), "bench-1");
        assert_eq!(options.keep_alive(), Duration::from_secs(60));
    }
}
