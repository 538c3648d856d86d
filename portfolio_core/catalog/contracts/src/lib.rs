use portfolio_models::catalog::{Catalog, ContactInfo, Project, SkillCategory, SocialLink};

/// Read-only views of the static portfolio catalog. All methods are pure
/// projections of data loaded once at process start.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait CatalogFeatureService: Send + Sync + 'static {
    fn catalog(&self) -> Catalog;

    fn projects(&self, filter: ProjectFilter) -> Vec<Project>;

    fn skills(&self) -> Vec<SkillCategory>;

    fn social_links(&self) -> Vec<SocialLink>;

    fn contact_info(&self) -> ContactInfo;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectFilter {
    /// Case-insensitive category match.
    pub category: Option<String>,
    pub featured_only: bool,
}
