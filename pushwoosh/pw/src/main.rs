#![deny(
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

//! pw is a command line application based on Pushwoosh API.
//!
//! If Pushwoosh application code is "XXXXX-XXXXX" and API access token is "token",
//!
//! ```
//! $ pw -a XXXXX-XXXXX -t token -m message
//! ```
//!
//! Or you can set environment variables instead,
//!
//! ```
//! $ export PUSHWOOSH_APPLICATION=XXXXX-XXXXX
//! $ export PUSHWOOSH_API_TOKEN=token
//! $ echo message | pw -d device1 -d device2
//! ```
//!
//! For more information,
//!
//! ```
//! $ pw -h
//! ```

use std::time::Duration;

use anyhow::bail;
use clap::Parser;
use log::{debug, Level};
use logging_timer::{finish, stimer};

use pushwoosh::{Config, MessageOptions, PushDescriptor, Pushwoosh, DEFAULT_HOST, SEND_NOW};

#[doc(hidden)]
#[derive(Debug, Parser)]
#[clap(about, author, version)]
struct Opts {
    /// Pushwoosh application code.
    #[clap(short, long, env = "PUSHWOOSH_APPLICATION")]
    application: String,
    /// API access token. Preferred over username and password.
    #[clap(short, long, env = "PUSHWOOSH_API_TOKEN")]
    token: Option<String>,
    /// Control panel username.
    #[clap(short, long, env = "PUSHWOOSH_USERNAME")]
    username: Option<String>,
    /// Control panel password.
    #[clap(short, long, env = "PUSHWOOSH_PASSWORD")]
    password: Option<String>,
    /// Message content. Read from standard input if omitted.
    #[clap(short, long)]
    message: Option<String>,
    /// Device token, may be repeated. Broadcast to all devices if omitted.
    #[clap(short, long)]
    device: Vec<String>,
    /// Segmentation condition.
    #[clap(long)]
    condition: Option<String>,
    /// "now" or "YYYY-MM-DD HH:mm".
    #[clap(long, default_value = SEND_NOW)]
    send_date: String,
    /// URL opened when the notification is tapped.
    #[clap(long)]
    link: Option<String>,
    /// iOS application badge number.
    #[clap(long, default_value_t = 0)]
    ios_badges: i64,
    /// Pushwoosh host.
    #[clap(long, env = "PUSHWOOSH_HOST", default_value = DEFAULT_HOST)]
    host: String,
    /// Request timeout in seconds.
    #[clap(long)]
    timeout: Option<u64>,
    /// Verbose.
    #[clap(short, long)]
    verbose: bool,
}

impl Opts {
    fn config(&self) -> anyhow::Result<Config<'_>> {
        let mut builder = Config::builder(self.application.as_str());
        match (&self.token, &self.username, &self.password) {
            (Some(token), _, _) => {
                builder.api_token(token.as_str());
            }
            (None, Some(username), Some(password)) => {
                builder.username(username.as_str()).password(password.as_str());
            }
            _ => bail!("either --token or both --username and --password are required"),
        }
        builder.host(self.host.as_str());
        if let Some(seconds) = self.timeout {
            builder.timeout(Duration::from_secs(seconds));
        }
        Ok(builder.build())
    }

    fn push(&self, content: String) -> PushDescriptor<'_> {
        let mut push = PushDescriptor::new(content);
        if !self.device.is_empty() {
            push.devices = Some(self.device.iter().map(String::as_str).collect());
        }
        push.condition = self.condition.as_deref();
        push
    }

    fn options(&self) -> MessageOptions<'_> {
        MessageOptions {
            send_date: &self.send_date,
            link: self.link.as_deref(),
            ios_badges: self.ios_badges,
        }
    }
}

#[doc(hidden)]
fn main() -> anyhow::Result<()> {
    use std::io::Read as _;

    pretty_env_logger::init();

    let opts: Opts = Opts::parse();
    let config = opts.config()?;

    let content = if let Some(ref m) = opts.message {
        m.clone()
    } else if atty::isnt(atty::Stream::Stdin) {
        debug!("load message from standard input");
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf.trim_end().to_string()
    } else {
        bail!("no message, give --message or pipe it to standard input");
    };

    let client = Pushwoosh::new(config);
    let pushes = [opts.push(content)];

    let tmr = stimer!(Level::Debug; "CREATE_MESSAGE");
    let res = client.send(&pushes, &opts.options())?;
    finish!(tmr);

    if !res.is_success() {
        bail!("Could not send push - {}", res.status_message);
    } else if opts.verbose {
        println!("{res:?}");
    }
    Ok(())
}
