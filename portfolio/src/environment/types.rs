use portfolio_audit_ndjson::NdjsonAuditLogService;
use portfolio_core_catalog_impl::CatalogFeatureServiceImpl;
use portfolio_core_contact_impl::ContactFeatureServiceImpl;
use portfolio_core_health_impl::HealthFeatureServiceImpl;
use portfolio_email_smtp::SmtpEmailService;
use portfolio_shared_impl::time::TimeServiceImpl;
use portfolio_templates_impl::TemplateServiceImpl;

// API
pub type RestServer =
    portfolio_api_rest::RestServer<Time, HealthFeature, ContactFeature, CatalogFeature, Audit>;

// Email
pub type Email = SmtpEmailService;

// Templates
pub type Template = TemplateServiceImpl;

// Audit
pub type Audit = NdjsonAuditLogService;

// Shared
pub type Time = TimeServiceImpl;

// Core
pub type HealthFeature = HealthFeatureServiceImpl<Time, Email>;
pub type ContactFeature = ContactFeatureServiceImpl<Time, Template, Email, Audit>;
pub type CatalogFeature = CatalogFeatureServiceImpl;
