use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use comptoir_service::QuotationContents;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{error, info, warn};

use crate::config::MailConfig;

/// Delivery policy the worker applies to every queued message.
#[derive(Debug, Clone)]
pub struct MailPolicy {
    pub send_timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail queue is full")]
    QueueFull,
    #[error("mail worker is not running")]
    WorkerGone,
}

/// Seam between the worker and the SMTP client so tests can record
/// outbound messages instead of delivering them.
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    async fn send(&self, message: Message) -> Result<(), String>;
}

pub struct SmtpMailTransport {
    inner: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailTransport {
    /// TLS relay in production; a plain connection stays available for
    /// local catch-all servers.
    pub fn from_config(config: &MailConfig) -> anyhow::Result<Self> {
        let mut builder = if config.smtp_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
        };
        builder = builder.port(config.smtp_port);
        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }
        Ok(Self {
            inner: builder.build(),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, message: Message) -> Result<(), String> {
        self.inner
            .send(message)
            .await
            .map(|_| ())
            .map_err(|err| err.to_string())
    }
}

/// Handle for queueing outbound mail. Delivery happens on a background
/// task; a request never waits on SMTP.
#[derive(Clone)]
pub struct Mailer {
    queue: mpsc::Sender<Message>,
}

impl Mailer {
    pub fn spawn(transport: Arc<dyn MailTransport>, policy: MailPolicy, queue_size: usize) -> Self {
        let (queue, inbox) = mpsc::channel(queue_size);
        tokio::spawn(deliver_loop(inbox, transport, policy));
        Self { queue }
    }

    /// Queues a message without waiting for delivery.
    pub fn enqueue(&self, message: Message) -> Result<(), MailError> {
        self.queue.try_send(message).map_err(|err| match err {
            TrySendError::Full(_) => MailError::QueueFull,
            TrySendError::Closed(_) => MailError::WorkerGone,
        })
    }
}

async fn deliver_loop(
    mut inbox: mpsc::Receiver<Message>,
    transport: Arc<dyn MailTransport>,
    policy: MailPolicy,
) {
    while let Some(message) = inbox.recv().await {
        deliver(transport.as_ref(), &policy, message).await;
    }
}

/// Sends one message: up to `max_retries` further attempts after the
/// first, each bounded by `send_timeout`, with linear backoff between
/// attempts.
async fn deliver(transport: &dyn MailTransport, policy: &MailPolicy, message: Message) {
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match tokio::time::timeout(policy.send_timeout, transport.send(message.clone())).await {
            Ok(Ok(())) => {
                info!(attempt, "delivered email");
                return;
            }
            Ok(Err(reason)) => warn!(attempt, %reason, "email delivery failed"),
            Err(_) => warn!(attempt, "email delivery timed out"),
        }
        if attempt > policy.max_retries {
            error!("giving up on email after {attempt} attempts");
            return;
        }
        tokio::time::sleep(policy.retry_backoff * attempt).await;
    }
}

/// Builds the outbound message for a quotation: templated plain-text
/// body plus the rendered document attached as `application/pdf`.
pub fn quotation_message(
    sender: &Mailbox,
    contents: &QuotationContents,
    body: String,
    pdf_bytes: Vec<u8>,
    filename: &str,
) -> Result<Message, String> {
    let customer = &contents.customer;
    let address: Address = customer
        .email
        .parse()
        .map_err(|err: lettre::address::AddressError| err.to_string())?;
    let to = Mailbox::new(
        Some(format!("{} {}", customer.first_name, customer.last_name)),
        address,
    );
    let subject = format!(
        "Comptoir quotation of {}",
        contents.quotation.date.format("%Y-%m-%d %H:%M")
    );
    let attachment = Attachment::new(filename.to_owned()).body(
        pdf_bytes,
        ContentType::parse("application/pdf").map_err(|err| err.to_string())?,
    );
    Message::builder()
        .from(sender.clone())
        .to(to)
        .subject(subject)
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(body))
                .singlepart(attachment),
        )
        .map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[derive(Default)]
    struct FlakyTransport {
        calls: AtomicU32,
        fail_first: u32,
    }

    #[async_trait]
    impl MailTransport for FlakyTransport {
        async fn send(&self, _message: Message) -> Result<(), String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.fail_first {
                Err(format!("boom {call}"))
            } else {
                Ok(())
            }
        }
    }

    struct SlowTransport;

    #[async_trait]
    impl MailTransport for SlowTransport {
        async fn send(&self, _message: Message) -> Result<(), String> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }
    }

    fn policy() -> MailPolicy {
        MailPolicy {
            send_timeout: Duration::from_millis(200),
            max_retries: 3,
            retry_backoff: Duration::from_millis(1),
        }
    }

    fn message() -> Message {
        Message::builder()
            .from("Comptoir <noreply@example.net>".parse().unwrap())
            .to("Jean Dupont <jean@dupont.example>".parse().unwrap())
            .subject("test")
            .body("hello".to_owned())
            .unwrap()
    }

    #[tokio::test]
    async fn delivers_after_transient_failures() {
        let transport = Arc::new(FlakyTransport {
            calls: AtomicU32::new(0),
            fail_first: 2,
        });
        deliver(transport.as_ref(), &policy(), message()).await;
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let transport = Arc::new(FlakyTransport {
            calls: AtomicU32::new(0),
            fail_first: u32::MAX,
        });
        let mut policy = policy();
        policy.max_retries = 1;
        deliver(transport.as_ref(), &policy, message()).await;
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn a_hung_transport_is_timed_out() {
        let mut policy = policy();
        policy.send_timeout = Duration::from_millis(10);
        policy.max_retries = 0;
        tokio::time::timeout(
            Duration::from_secs(5),
            deliver(&SlowTransport, &policy, message()),
        )
        .await
        .expect("deliver did not give up on a hung transport");
    }

    #[tokio::test]
    async fn the_worker_drains_the_queue() {
        let transport = Arc::new(FlakyTransport {
            calls: AtomicU32::new(0),
            fail_first: 0,
        });
        let mailer = Mailer::spawn(transport.clone(), policy(), 4);
        mailer.enqueue(message()).expect("could not queue message");
        mailer.enqueue(message()).expect("could not queue message");

        for _ in 0..200 {
            if transport.calls.load(Ordering::SeqCst) == 2 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("queued messages were never delivered");
    }
}
