use std::borrow::Cow;
use std::time::Duration;

/// Pushwoosh control panel host.
pub const DEFAULT_HOST: &str = "https://cp.pushwoosh.com";

/// Credentials and transport settings, held for the life of a [`crate::Pushwoosh`] client.
///
/// Nothing is validated here. Missing or wrong credentials only show up
/// when the service rejects a request.
#[derive(Clone, Debug)]
pub struct Config<'a> {
    application: Cow<'a, str>,
    username: Option<Cow<'a, str>>,
    password: Option<Cow<'a, str>>,
    api_token: Option<Cow<'a, str>>,
    host: Cow<'a, str>,
    timeout: Option<Duration>,
}

impl<'a> Config<'a> {
    /// Creates a [`Config`] authenticating with an API access token.
    ///
    /// ```rust
    /// # use pushwoosh::Config;
    /// let config = Config::with_token("XXXXX-XXXXX", "token");
    /// assert_eq!(Some("token"), config.api_token());
    /// ```
    pub fn with_token<A, T>(application: A, api_token: T) -> Self
    where
        A: Into<Cow<'a, str>>,
        T: Into<Cow<'a, str>>,
    {
        Self::builder(application).api_token(api_token).build()
    }

    /// Creates a [`Config`] authenticating with a control panel account.
    ///
    /// ```rust
    /// # use pushwoosh::Config;
    /// let config = Config::with_credentials("XXXXX-XXXXX", "user", "secret");
    /// assert_eq!(None, config.api_token());
    /// ```
    pub fn with_credentials<A, U, P>(application: A, username: U, password: P) -> Self
    where
        A: Into<Cow<'a, str>>,
        U: Into<Cow<'a, str>>,
        P: Into<Cow<'a, str>>,
    {
        Self::builder(application)
            .username(username)
            .password(password)
            .build()
    }

    /// Creates a [`ConfigBuilder`] for the given application code.
    pub fn builder<T>(application: T) -> ConfigBuilder<'a>
    where
        T: Into<Cow<'a, str>>,
    {
        ConfigBuilder {
            application: application.into(),
            username: None,
            password: None,
            api_token: None,
            host: Cow::Borrowed(DEFAULT_HOST),
            timeout: None,
        }
    }

    /// Pushwoosh application code.
    pub fn application(&self) -> &str {
        &self.application
    }

    /// Control panel username.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Control panel password.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// API access token. Takes precedence over username and password.
    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }

    /// Base URL requests are sent to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Timeout of the whole request. `None` leaves ureq defaults in place.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Builder of [`Config`].
#[derive(Clone, Debug)]
pub struct ConfigBuilder<'a> {
    application: Cow<'a, str>,
    username: Option<Cow<'a, str>>,
    password: Option<Cow<'a, str>>,
    api_token: Option<Cow<'a, str>>,
    host: Cow<'a, str>,
    timeout: Option<Duration>,
}

impl<'a> ConfigBuilder<'a> {
    /// Control panel username.
    pub fn username<T: Into<Cow<'a, str>>>(&mut self, username: T) -> &mut Self {
        self.username = Some(username.into());
        self
    }

    /// Control panel password.
    pub fn password<T: Into<Cow<'a, str>>>(&mut self, password: T) -> &mut Self {
        self.password = Some(password.into());
        self
    }

    /// API access token.
    pub fn api_token<T: Into<Cow<'a, str>>>(&mut self, api_token: T) -> &mut Self {
        self.api_token = Some(api_token.into());
        self
    }

    /// Overrides [`DEFAULT_HOST`], e.g. for a proxy or a fake server.
    ///
    /// Only scheme, host and port are used. Any path is replaced by
    /// `/json/1.3/createMessage`, so a path-prefixed proxy URL does not work.
    pub fn host<T: Into<Cow<'a, str>>>(&mut self, host: T) -> &mut Self {
        self.host = host.into();
        self
    }

    /// Timeout of the whole request, from connecting to reading the body.
    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds [`Config`].
    pub fn build(&self) -> Config<'a> {
        Config {
            application: self.application.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            api_token: self.api_token.clone(),
            host: self.host.clone(),
            timeout: self.timeout,
        }
    }
}
