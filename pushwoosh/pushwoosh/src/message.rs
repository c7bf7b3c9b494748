use std::borrow::Cow;

use serde::Serialize;

use crate::Config;

/// `send_date` telling Pushwoosh to deliver immediately.
pub const SEND_NOW: &str = "now";

/// One notification to create. <https://docs.pushwoosh.com/platform-docs/api-reference/messages#createmessage>
#[derive(Clone, Debug, Default)]
pub struct PushDescriptor<'a> {
    content: Cow<'a, str>,
    /// Device tokens to push to. `None` broadcasts to every subscribed device.
    pub devices: Option<Vec<&'a str>>,
    /// Segmentation condition, sent as `conditions`.
    pub condition: Option<&'a str>,
}

impl<'a> PushDescriptor<'a> {
    /// Creates a broadcast [`PushDescriptor`].
    ///
    /// ```rust
    /// # use pushwoosh::PushDescriptor;
    /// let mut push = PushDescriptor::new("Hello");
    /// push.devices = Some(vec!["device token"]);
    /// ```
    pub fn new<T>(content: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Message content.
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Values shared by every notification created in one call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MessageOptions<'a> {
    /// `now` or `YYYY-MM-DD HH:mm`.
    pub send_date: &'a str,
    /// URL opened when the notification is tapped.
    pub link: Option<&'a str>,
    /// iOS application badge number.
    pub ios_badges: i64,
}

impl Default for MessageOptions<'_> {
    fn default() -> Self {
        Self {
            send_date: SEND_NOW,
            link: None,
            ios_badges: 0,
        }
    }
}

/// Authentication block of [`MessageRequest`], flattened next to `application`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Auth<'a> {
    /// `{"auth": "..."}`
    Token {
        /// API access token.
        auth: &'a str,
    },
    /// `{"username": "...", "password": "..."}`
    Credentials {
        /// Control panel username.
        #[serde(skip_serializing_if = "Option::is_none")]
        username: Option<&'a str>,
        /// Control panel password.
        #[serde(skip_serializing_if = "Option::is_none")]
        password: Option<&'a str>,
    },
}

/// Wire format of one notification.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct NotificationPayload<'a> {
    /// Shared [`MessageOptions::send_date`].
    pub send_date: &'a str,
    /// [`PushDescriptor::content`].
    pub content: &'a str,
    /// Shared [`MessageOptions::ios_badges`].
    pub ios_badges: i64,
    /// [`PushDescriptor::devices`], omitted for broadcasts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devices: Option<&'a [&'a str]>,
    /// Shared [`MessageOptions::link`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<&'a str>,
    /// [`PushDescriptor::condition`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<&'a str>,
}

/// Body of a `createMessage` call, sent wrapped in `{"request": ...}`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MessageRequest<'a> {
    /// Pushwoosh application code.
    pub application: &'a str,
    /// Token or username and password.
    #[serde(flatten)]
    pub auth: Auth<'a>,
    /// One entry per [`PushDescriptor`], in order.
    pub notifications: Vec<NotificationPayload<'a>>,
}

#[derive(Serialize)]
pub(crate) struct Envelope<'a> {
    pub(crate) request: &'a MessageRequest<'a>,
}

/// Assembles the `createMessage` payload without touching the network.
///
/// The API token wins over username and password when both are configured.
pub fn build_request<'a>(
    config: &'a Config<'_>,
    pushes: &'a [PushDescriptor<'_>],
    options: &MessageOptions<'a>,
) -> MessageRequest<'a> {
    let auth = match config.api_token() {
        Some(auth) => Auth::Token { auth },
        None => Auth::Credentials {
            username: config.username(),
            password: config.password(),
        },
    };

    let notifications = pushes
        .iter()
        .map(|push| NotificationPayload {
            send_date: options.send_date,
            content: push.content(),
            ios_badges: options.ios_badges,
            devices: push.devices.as_deref(),
            link: options.link,
            conditions: push.condition,
        })
        .collect();

    MessageRequest {
        application: config.application(),
        auth,
        notifications,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::{json, Value};

    fn to_value(request: &MessageRequest<'_>) -> Value {
        serde_json::to_value(Envelope { request }).unwrap()
    }

    #[test]
    fn t_token_scenario() {
        let config = Config::with_token("APP1", "TOK");
        let mut push = PushDescriptor::new("Hello");
        push.devices = Some(vec!["D1"]);
        let pushes = [push];

        let request = build_request(&config, &pushes, &MessageOptions::default());
        assert_eq!(
            json!({
                "request": {
                    "application": "APP1",
                    "auth": "TOK",
                    "notifications": [{
                        "send_date": "now",
                        "content": "Hello",
                        "ios_badges": 0,
                        "devices": ["D1"]
                    }]
                }
            }),
            to_value(&request)
        );
    }

    #[test]
    fn t_token_wins_over_credentials() {
        let config = Config::builder("APP1")
            .username("user")
            .password("secret")
            .api_token("TOK")
            .build();
        let pushes: Vec<PushDescriptor<'_>> = Vec::new();
        let request = build_request(&config, &pushes, &MessageOptions::default());
        assert_eq!(Auth::Token { auth: "TOK" }, request.auth);

        let value = to_value(&request);
        assert_eq!(json!("TOK"), value["request"]["auth"]);
        assert!(value["request"].get("username").is_none());
        assert!(value["request"].get("password").is_none());
    }

    #[test]
    fn t_credentials() {
        let config = Config::with_credentials("APP1", "user", "secret");
        let pushes = [PushDescriptor::new("Hello")];
        let request = build_request(&config, &pushes, &MessageOptions::default());

        let value = to_value(&request);
        assert_eq!(json!("APP1"), value["request"]["application"]);
        assert_eq!(json!("user"), value["request"]["username"]);
        assert_eq!(json!("secret"), value["request"]["password"]);
        assert!(value["request"].get("auth").is_none());
    }

    #[test]
    fn t_one_payload_per_push_in_order() {
        let config = Config::with_token("APP1", "TOK");
        let pushes: Vec<_> = ["first", "second", "third"]
            .iter()
            .map(|c| PushDescriptor::new(*c))
            .collect();
        let request = build_request(&config, &pushes, &MessageOptions::default());

        let contents: Vec<_> = request.notifications.iter().map(|n| n.content).collect();
        assert_eq!(vec!["first", "second", "third"], contents);
    }

    #[test]
    fn t_shared_options() {
        let config = Config::with_token("APP1", "TOK");
        let pushes = [PushDescriptor::new("a"), PushDescriptor::new("b")];
        let options = MessageOptions {
            send_date: "2026-10-16 09:00",
            link: Some("https://example.com/"),
            ios_badges: 3,
        };
        let request = build_request(&config, &pushes, &options);

        for n in &request.notifications {
            assert_eq!("2026-10-16 09:00", n.send_date);
            assert_eq!(Some("https://example.com/"), n.link);
            assert_eq!(3, n.ios_badges);
        }
        let value = to_value(&request);
        for n in value["request"]["notifications"].as_array().unwrap() {
            assert_eq!(json!("https://example.com/"), n["link"]);
        }
    }

    #[test]
    fn t_absent_optionals_are_omitted() {
        let config = Config::with_token("APP1", "TOK");
        let pushes = [PushDescriptor::new("broadcast")];
        let request = build_request(&config, &pushes, &MessageOptions::default());

        let value = to_value(&request);
        let n = &value["request"]["notifications"][0];
        assert!(n.get("devices").is_none());
        assert!(n.get("link").is_none());
        assert!(n.get("conditions").is_none());
    }

    #[test]
    fn t_empty_devices_are_kept() {
        let config = Config::with_token("APP1", "TOK");
        let mut push = PushDescriptor::new("nobody");
        push.devices = Some(vec![]);
        let pushes = [push];
        let request = build_request(&config, &pushes, &MessageOptions::default());

        let value = to_value(&request);
        assert_eq!(json!([]), value["request"]["notifications"][0]["devices"]);
    }

    #[test]
    fn t_condition_becomes_conditions() {
        let config = Config::with_token("APP1", "TOK");
        let mut push = PushDescriptor::new("Hello");
        push.condition = Some("T(\"City\", EQ, \"Taipei\")");
        let pushes = [push];
        let request = build_request(&config, &pushes, &MessageOptions::default());

        let value = to_value(&request);
        let n = &value["request"]["notifications"][0];
        assert_eq!(json!("T(\"City\", EQ, \"Taipei\")"), n["conditions"]);
        assert!(n.get("condition").is_none());
    }
}
