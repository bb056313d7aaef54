// Partner directory with a live name filter

use crate::models::Partner;

#[derive(Debug, Clone, Default)]
pub struct Directory {
    partners: Vec<Partner>,
    query: String,
}

impl Directory {
    pub fn new(partners: Vec<Partner>) -> Self {
        Directory {
            partners,
            query: String::new(),
        }
    }

    pub fn partners(&self) -> &[Partner] {
        &self.partners
    }

    pub fn get(&self, partner_id: &str) -> Option<&Partner> {
        self.partners.iter().find(|p| p.id == partner_id)
    }

    pub fn contains(&self, partner_id: &str) -> bool {
        self.get(partner_id).is_some()
    }

    /// Case-insensitive substring match on display names, in roster order.
    pub fn search(&self, query: &str) -> Vec<&Partner> {
        let needle = query.to_lowercase();
        self.partners
            .iter()
            .filter(|p| p.display_name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    /// Partners matching the current query.
    pub fn filtered(&self) -> Vec<&Partner> {
        self.search(&self.query)
    }
}
