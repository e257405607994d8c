/// Supplies the SDK key pair at authentication time.
///
/// Credential storage and retrieval belong to the host application; the
/// session only reads the pair when it issues the auth request.
pub trait CredentialsProvider: Send + Sync {
    fn app_key(&self) -> String;
    fn app_secret(&self) -> String;
}

/// Fixed in-memory credentials, for tests and simple hosts.
pub struct StaticCredentials {
    app_key: String,
    app_secret: String,
}

impl StaticCredentials {
    pub fn new(app_key: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            app_secret: app_secret.into(),
        }
    }
}

impl CredentialsProvider for StaticCredentials {
    fn app_key(&self) -> String {
        self.app_key.clone()
    }

    fn app_secret(&self) -> String {
        self.app_secret.clone()
    }
}
