use parlor_core::IceServerConfig;

#[derive(Clone)]
pub struct ClientConfig {
    /// STUN/TURN servers handed to the peer connection capability.
    pub ice_servers: Vec<IceServerConfig>,
    /// Capacity of the intent channel between handle and client loop.
    pub intent_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig {
                urls: vec!["stun:stun.l.google.com:19302".to_owned()],
                username: None,
                credential: None,
            }],
            intent_capacity: 100,
        }
    }
}
