use crate::core::config::data::{path_display, Config, EndpointOverrides};

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        if let Ok(path) = Self::get_config_path() {
            println!("  file: {}", path_display(path));
        }
        match &self.chat_endpoint {
            Some(endpoint) => println!("  chat-endpoint: {endpoint}"),
            None => println!("  chat-endpoint: (unset)"),
        }
        match &self.health_endpoint {
            Some(endpoint) => println!("  health-endpoint: {endpoint}"),
            None => println!("  health-endpoint: (unset)"),
        }

        let effective = self.resolve_endpoints(&EndpointOverrides::default(), |key| {
            std::env::var(key).ok()
        });
        println!("Effective endpoints:");
        println!("  chat: {}", effective.chat);
        println!("  health: {}", effective.health);
    }
}
