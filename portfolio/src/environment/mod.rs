use std::sync::Arc;

use chrono::Utc;
use portfolio_api_rest::{RateLimit, RealIpConfig, RestServerConfig};
use portfolio_config::{Config, Environment};
use portfolio_core_contact_impl::ContactFeatureConfig;
use portfolio_core_health_impl::HealthFeatureConfig;
use portfolio_models::email_address::EmailAddress;
use types::{
    Audit, CatalogFeature, ContactFeature, Email, HealthFeature, RestServer, Template, Time,
};

pub mod types;

/// Wires the full service graph from the loaded configuration and the
/// already initialized infrastructure services.
pub fn build_rest_server(config: &Config, email: Email, audit: Audit) -> anyhow::Result<RestServer> {
    let time = Time::default();
    let templates = Template::default();

    let recipient = EmailAddress(config.contact.recipient.as_str().parse()?)
        .with_name(config.catalog.personal.name.clone());

    let contact = ContactFeature {
        time,
        templates,
        email: email.clone(),
        audit: audit.clone(),
        config: ContactFeatureConfig {
            recipient: Arc::new(recipient),
            owner_name: config.catalog.personal.name.as_str().into(),
            owner_title: config.catalog.personal.title.as_str().into(),
            social: config.catalog.social.clone().into(),
        },
    };

    let health = HealthFeature {
        time,
        email,
        config: HealthFeatureConfig {
            cache_ttl: config.health.cache_ttl.0,
        },
        started_at: Utc::now(),
        state: Default::default(),
    };

    let catalog = CatalogFeature {
        catalog: Arc::new(config.catalog.clone()),
    };

    let rest_config = RestServerConfig {
        environment: config.environment.as_str().to_owned(),
        expose_internal_errors: matches!(config.environment, Environment::Development),
        allowed_origins: config.cors.allowed_origins.clone(),
        real_ip: config.http.real_ip.as_ref().map(|real_ip| {
            Arc::new(RealIpConfig {
                header: real_ip.header.clone(),
                set_from: real_ip.set_from,
            })
        }),
        general_rate_limit: RateLimit {
            window: config.rate_limit.general.window.0,
            max: config.rate_limit.general.max,
        },
        contact_rate_limit: RateLimit {
            window: config.rate_limit.contact.window.0,
            max: config.rate_limit.contact.max,
        },
    };

    Ok(RestServer {
        time,
        health,
        contact,
        catalog,
        audit,
        config: rest_config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email;

    #[tokio::test]
    async fn build_from_default_config() {
        let config = portfolio_config::load(&[portfolio_config::DEFAULT_CONFIG_PATH]).unwrap();

        let email = email::connect(&config.email).unwrap();
        let directory = tempfile::tempdir().unwrap();
        let audit = Audit::new(directory.path().into()).await.unwrap();

        build_rest_server(&config, email, audit).unwrap();
    }
}
