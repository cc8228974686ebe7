use std::sync::Arc;
use std::time::Duration;

use storage::{
    Database,
    services::{IdentityGenerator, PaymentEnforcement, RandomIdentity},
    traits::{EventRegistry, RegistrationLedger},
};

use crate::config::Config;
use crate::notifier::{LogNotifier, Notifier, SmtpNotifier};
use crate::payment_gateway::{PaymentGateway, RazorpayGateway, UnconfiguredGateway};

/// Shared handles for every request handler.
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<dyn EventRegistry>,
    pub ledger: Arc<dyn RegistrationLedger>,
    pub identities: Arc<dyn IdentityGenerator>,
    pub notifier: Arc<dyn Notifier>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub enforcement: PaymentEnforcement,
    pub currency: String,
    pub notify_timeout: Duration,
}

impl AppState {
    pub fn from_config(db: Database, config: &Config) -> anyhow::Result<Self> {
        let db = Arc::new(db);

        let notifier: Arc<dyn Notifier> = match &config.smtp {
            Some(smtp) => Arc::new(SmtpNotifier::new(smtp)?),
            None => {
                tracing::warn!("SMTP not configured, confirmations will only be logged");
                Arc::new(LogNotifier)
            }
        };

        let gateway: Arc<dyn PaymentGateway> = match &config.razorpay {
            Some(razorpay) => Arc::new(RazorpayGateway::new(
                razorpay.clone(),
                config.upstream_timeout,
            )?),
            None => {
                tracing::warn!("Razorpay keys not configured, paid orders will be refused");
                Arc::new(UnconfiguredGateway)
            }
        };

        Ok(Self {
            events: db.clone(),
            ledger: db,
            identities: Arc::new(RandomIdentity),
            notifier,
            gateway,
            enforcement: config.payment_enforcement,
            currency: config.currency.clone(),
            notify_timeout: config.notify_timeout,
        })
    }
}
