use std::sync::Arc;

use portfolio_core_catalog_contracts::{CatalogFeatureService, ProjectFilter};
use portfolio_models::catalog::{Catalog, ContactInfo, Project, SkillCategory, SocialLink};

#[derive(Debug, Clone)]
pub struct CatalogFeatureServiceImpl {
    pub catalog: Arc<Catalog>,
}

impl CatalogFeatureService for CatalogFeatureServiceImpl {
    fn catalog(&self) -> Catalog {
        (*self.catalog).clone()
    }

    fn projects(&self, filter: ProjectFilter) -> Vec<Project> {
        self.catalog
            .projects
            .iter()
            .filter(|project| {
                filter
                    .category
                    .as_ref()
                    .is_none_or(|category| project.category.eq_ignore_ascii_case(category))
                    && (!filter.featured_only || project.featured)
            })
            .cloned()
            .collect()
    }

    fn skills(&self) -> Vec<SkillCategory> {
        self.catalog.skills.clone()
    }

    fn social_links(&self) -> Vec<SocialLink> {
        self.catalog.social.clone()
    }

    fn contact_info(&self) -> ContactInfo {
        ContactInfo {
            email: self.catalog.personal.email.clone(),
            location: self.catalog.personal.location.clone(),
            social: self.catalog.social.clone(),
        }
    }
}
