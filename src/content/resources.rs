//! Resource guides
//!
//! Visa and packing checklists shown on the resources page.

use once_cell::sync::Lazy;
use serde::Serialize;

/// Per-country visa requirements checklist
#[derive(Debug, Clone, Serialize)]
pub struct VisaGuide {
    pub id: u32,
    pub country: &'static str,
    pub requirements: Vec<&'static str>,
    pub processing_time: &'static str,
}

/// A packing checklist section
#[derive(Debug, Clone, Serialize)]
pub struct PackingGuide {
    pub id: u32,
    pub title: &'static str,
    pub items: Vec<&'static str>,
}

static VISA_GUIDES: Lazy<Vec<VisaGuide>> = Lazy::new(|| {
    vec![
        VisaGuide {
            id: 1,
            country: "United States",
            requirements: vec![
                "Valid passport with at least 6 months validity",
                "Completed DS-160 form",
                "SEVIS payment receipt",
                "I-20 form from university",
                "Financial documents showing sufficient funds",
            ],
            processing_time: "2-3 weeks",
        },
        VisaGuide {
            id: 2,
            country: "United Kingdom",
            requirements: vec![
                "Valid passport",
                "CAS number from university",
                "Proof of funding for course and living costs",
                "TB test results (if applicable)",
                "English language proficiency proof",
            ],
            processing_time: "3-4 weeks",
        },
        VisaGuide {
            id: 3,
            country: "Canada",
            requirements: vec![
                "Valid passport",
                "Letter of acceptance from university",
                "Proof of financial support",
                "Statement of purpose",
                "Biometrics",
            ],
            processing_time: "4-8 weeks",
        },
    ]
});

static PACKING_GUIDES: Lazy<Vec<PackingGuide>> = Lazy::new(|| {
    vec![
        PackingGuide {
            id: 1,
            title: "Essential Documents",
            items: vec![
                "Passport and visa documents",
                "University acceptance letter",
                "Insurance documents",
                "Birth certificate (certified copy)",
                "Medical records and prescriptions",
                "International driving permit",
            ],
        },
        PackingGuide {
            id: 2,
            title: "Academic Materials",
            items: vec![
                "Laptop and charger",
                "Portable hard drive",
                "Basic stationery",
                "Calculator (if required)",
                "Academic transcripts",
                "Language certificates",
            ],
        },
        PackingGuide {
            id: 3,
            title: "Personal Items",
            items: vec![
                "Weather-appropriate clothing",
                "Medications and prescriptions",
                "Power adapters",
                "Photos from home",
                "Comfort snacks",
            ],
        },
    ]
});

/// Visa requirement checklists by country
pub fn visa_guides() -> &'static [VisaGuide] {
    &VISA_GUIDES
}

/// Packing checklists
pub fn packing_guides() -> &'static [PackingGuide] {
    &PACKING_GUIDES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guides_are_nonempty() {
        assert!(!visa_guides().is_empty());
        assert!(!packing_guides().is_empty());
        assert!(visa_guides().iter().all(|g| !g.requirements.is_empty()));
        assert!(packing_guides().iter().all(|g| !g.items.is_empty()));
    }
}
