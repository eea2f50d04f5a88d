//! # config
//!
//! Share credentials and session options

use std::time::Duration;

/// Share mounted when the caller doesn't provide one
pub const DEFAULT_SHARE_NAME: &str = "RaspberryHDD";
/// Default SMB port (direct hosting over TCP)
pub const DEFAULT_PORT: u16 = 445;
/// Default timeout for establishing the TCP connection to the server
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default timeout for the server to answer a request
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(30);
/// Default workgroup used for authentication
pub const DEFAULT_WORKGROUP: &str = "WORKGROUP";

/// Identity and location of the share a client works on.
///
/// The identity is fixed for the whole lifetime of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareCredentials {
    pub(crate) server: String,
    pub(crate) share: String,
    pub(crate) username: String,
    pub(crate) password: String,
}

impl Default for ShareCredentials {
    fn default() -> Self {
        Self {
            server: String::default(),
            share: DEFAULT_SHARE_NAME.to_string(),
            username: String::default(),
            password: String::default(),
        }
    }
}

impl ShareCredentials {
    /// Instantiate credentials for `server`, using the default share
    pub fn new<S: AsRef<str>>(server: S, username: S, password: S) -> Self {
        Self {
            server: server.as_ref().to_string(),
            username: username.as_ref().to_string(),
            password: password.as_ref().to_string(),
            ..Default::default()
        }
    }

    /// Construct ShareCredentials with the provided server
    pub fn server<S: AsRef<str>>(mut self, server: S) -> Self {
        self.server = server.as_ref().to_string();
        self
    }

    /// Construct ShareCredentials with the provided share name.
    /// An empty name falls back to [`DEFAULT_SHARE_NAME`].
    pub fn share<S: AsRef<str>>(mut self, share: S) -> Self {
        let share = share.as_ref().trim_matches('/');
        self.share = if share.is_empty() {
            DEFAULT_SHARE_NAME.to_string()
        } else {
            share.to_string()
        };
        self
    }

    /// Construct ShareCredentials with the provided username
    pub fn username<S: AsRef<str>>(mut self, username: S) -> Self {
        self.username = username.as_ref().to_string();
        self
    }

    /// Construct ShareCredentials with the provided password
    pub fn password<S: AsRef<str>>(mut self, password: S) -> Self {
        self.password = password.as_ref().to_string();
        self
    }

    pub fn get_server(&self) -> &str {
        &self.server
    }

    pub fn get_share(&self) -> &str {
        &self.share
    }

    pub fn get_username(&self) -> &str {
        &self.username
    }

    /// Server host, without the `:port` suffix if any.
    /// IPv6 addresses are returned without brackets.
    pub(crate) fn server_host(&self) -> &str {
        if let Some(rest) = self.server.strip_prefix('[') {
            return rest.split_once(']').map_or(rest, |(host, _)| host);
        }
        match self.server.rsplit_once(':') {
            Some((host, port)) if !host.contains(':') && port.parse::<u16>().is_ok() => host,
            _ => self.server.as_str(),
        }
    }

    /// `smb://` uri of the server at `port`
    #[cfg(target_family = "unix")]
    pub(crate) fn server_uri(&self, port: u16) -> String {
        let host = self.server_host();
        if host.contains(':') {
            format!("smb://[{host}]:{port}")
        } else {
            format!("smb://{host}:{port}")
        }
    }
}

/// Connection options for a share session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareOptions {
    pub(crate) port: u16,
    pub(crate) connect_timeout: Duration,
    pub(crate) response_timeout: Duration,
    pub(crate) workgroup: String,
}

impl Default for ShareOptions {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
            workgroup: DEFAULT_WORKGROUP.to_string(),
        }
    }
}

impl ShareOptions {
    /// Set the TCP port the server listens on
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the timeout for establishing the connection
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the timeout for the server to answer a request
    pub fn response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Set the workgroup (domain) used for authentication
    pub fn workgroup<S: AsRef<str>>(mut self, workgroup: S) -> Self {
        self.workgroup = workgroup.as_ref().to_string();
        self
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub fn get_connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn get_response_timeout(&self) -> Duration {
        self.response_timeout
    }
}

#[cfg(test)]
mod test {

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn should_init_credentials_with_default_share() {
        let credentials = ShareCredentials::new("192.168.1.10", "pi", "secret");
        assert_eq!(credentials.get_server(), "192.168.1.10");
        assert_eq!(credentials.get_username(), "pi");
        assert_eq!(&credentials.password, "secret");
        assert_eq!(credentials.get_share(), DEFAULT_SHARE_NAME);
        assert_eq!(ShareCredentials::default().get_share(), DEFAULT_SHARE_NAME);
    }

    #[test]
    fn should_construct_credentials() {
        let credentials = ShareCredentials::default()
            .server("nas.local")
            .share("/Photos/")
            .username("test")
            .password("foobar");
        assert_eq!(credentials.get_server(), "nas.local");
        assert_eq!(credentials.get_share(), "Photos");
        assert_eq!(credentials.get_username(), "test");
        assert_eq!(&credentials.password, "foobar");
    }

    #[test]
    fn should_fallback_to_default_share_when_empty() {
        let credentials = ShareCredentials::new("nas", "u", "p").share("");
        assert_eq!(credentials.get_share(), DEFAULT_SHARE_NAME);
    }

    #[test]
    fn should_strip_port_from_server_host() {
        let credentials = ShareCredentials::new("nas.local:3445", "u", "p");
        assert_eq!(credentials.server_host(), "nas.local");
        let credentials = ShareCredentials::new("10.0.0.2", "u", "p");
        assert_eq!(credentials.server_host(), "10.0.0.2");
        let credentials = ShareCredentials::new("::1", "u", "p");
        assert_eq!(credentials.server_host(), "::1");
        let credentials = ShareCredentials::new("[::1]:3445", "u", "p");
        assert_eq!(credentials.server_host(), "::1");
        let credentials = ShareCredentials::new("[fe80::1]", "u", "p");
        assert_eq!(credentials.server_host(), "fe80::1");
    }

    #[test]
    #[cfg(target_family = "unix")]
    fn should_make_server_uri() {
        let credentials = ShareCredentials::new("nas.local:3445", "u", "p");
        assert_eq!(credentials.server_uri(3445), "smb://nas.local:3445");
        let credentials = ShareCredentials::new("[::1]:445", "u", "p");
        assert_eq!(credentials.server_uri(445), "smb://[::1]:445");
        let credentials = ShareCredentials::new("::1", "u", "p");
        assert_eq!(credentials.server_uri(445), "smb://[::1]:445");
    }

    #[test]
    fn should_construct_options() {
        let options = ShareOptions::default();
        assert_eq!(options.get_port(), 445);
        assert_eq!(options.get_connect_timeout(), Duration::from_secs(30));
        assert_eq!(options.get_response_timeout(), Duration::from_secs(30));
        assert_eq!(&options.workgroup, "WORKGROUP");
        let options = options
            .port(3445)
            .connect_timeout(Duration::from_secs(5))
            .response_timeout(Duration::from_secs(10))
            .workgroup("pavao");
        assert_eq!(options.get_port(), 3445);
        assert_eq!(options.get_connect_timeout(), Duration::from_secs(5));
        assert_eq!(options.get_response_timeout(), Duration::from_secs(10));
        assert_eq!(&options.workgroup, "pavao");
    }
}
