use portfolio_models::catalog::SocialLink;
use serde::Serialize;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TemplateService: Send + Sync + 'static {
    /// Render the given template.
    fn render<T: Template + 'static>(&self, template: &T) -> anyhow::Result<String>;
}

#[cfg(feature = "mock")]
impl MockTemplateService {
    pub fn with_render<T: Template + Send + PartialEq + std::fmt::Debug + 'static>(
        mut self,
        template: T,
        result: String,
    ) -> Self {
        self.expect_render()
            .once()
            .with(mockall::predicate::eq(template))
            .return_once(|_| Ok(result));
        self
    }
}

pub trait Template: Serialize {
    const NAME: &'static str;
    const TEMPLATE: &'static str;
}

pub const BASE_TEMPLATE: &str = include_str!("../templates/base.html");

macro_rules! templates {
    ($( $ident:ident ( $path:literal ), )* ) => {
        $(
            impl Template for $ident {
                // Names keep the `.html` suffix so tera applies autoescaping
                // to every interpolated field.
                const NAME: &'static str = $path;
                const TEMPLATE: &'static str = include_str!(concat!("../templates/", $path));
            }
        )*

        pub const TEMPLATES: &[(&str, &str)] = &[
            $( ($ident::NAME, $ident::TEMPLATE) ),*
        ];
    };
}

templates! {
    ContactNotificationTemplate("contact_notification.html"),
    ContactAutoReplyTemplate("contact_auto_reply.html"),
}

/// The internal notification delivered to the site owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactNotificationTemplate {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    /// Message body split on newlines; the template joins them with `<br>`
    /// so each line is escaped individually.
    pub message_lines: Vec<String>,
    pub received_at: String,
}

/// The confirmation sent back to the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactAutoReplyTemplate {
    pub name: String,
    pub owner_name: String,
    pub owner_title: String,
    pub social: Vec<SocialLink>,
}
