use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

use super::{is_valid_email, is_valid_url, violation};

pub const TABLE: &str = "bootcamps";

/// Columns the query translator may filter, sort or select on
pub const COLUMNS: &[&str] = &[
    "id",
    "name",
    "slug",
    "description",
    "website",
    "phone",
    "email",
    "latitude",
    "longitude",
    "formatted_address",
    "street",
    "city",
    "state",
    "zipcode",
    "country",
    "careers",
    "average_rating",
    "average_cost",
    "photo",
    "housing",
    "job_assistance",
    "job_guarantee",
    "accept_gi",
    "created_at",
    "user_id",
];

/// Array-typed columns: membership filters translate to overlap
pub const ARRAY_COLUMNS: &[&str] = &["careers"];

/// Supported career tracks
pub const CAREERS: &[&str] = &[
    "Web Development",
    "Mobile Development",
    "UI/UX",
    "Data Science",
    "Business",
    "Other",
];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bootcamp {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[sqlx(flatten)]
    pub location: Location,
    pub careers: Vec<String>,
    pub average_rating: Option<f64>,
    pub average_cost: Option<f64>,
    pub photo: String,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
}

/// Geocoded point plus normalized address components; derived, never
/// client-supplied
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub formatted_address: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBootcamp {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub careers: Option<Vec<String>>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
}

/// Validated create payload, ready for storage
#[derive(Debug, Clone)]
pub struct BootcampAttrs {
    pub name: String,
    pub description: String,
    pub address: String,
    pub careers: Vec<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
}

impl CreateBootcamp {
    pub fn validate(self) -> Result<BootcampAttrs, HashMap<String, String>> {
        let mut errors = HashMap::new();

        let name = self.name.unwrap_or_default();
        if name.trim().is_empty() {
            violation(&mut errors, "name", "Please add a name");
        } else if name.len() > 50 {
            violation(&mut errors, "name", "Name can not be more than 50 characters");
        }

        let description = self.description.unwrap_or_default();
        if description.trim().is_empty() {
            violation(&mut errors, "description", "Please add a description");
        } else if description.len() > 500 {
            violation(
                &mut errors,
                "description",
                "Description can not be more than 500 characters",
            );
        }

        let address = self.address.unwrap_or_default();
        if address.trim().is_empty() {
            violation(&mut errors, "address", "Please add an address");
        }

        let careers = self.careers.unwrap_or_default();
        validate_careers(&careers, &mut errors);

        if let Some(website) = &self.website {
            if !is_valid_url(website) {
                violation(
                    &mut errors,
                    "website",
                    "Please use a valid URL with HTTP or HTTPS",
                );
            }
        }
        if let Some(phone) = &self.phone {
            if phone.len() > 20 {
                violation(
                    &mut errors,
                    "phone",
                    "Phone number can not be longer than 20 characters",
                );
            }
        }
        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                violation(&mut errors, "email", "Please add a valid email");
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(BootcampAttrs {
            name,
            description,
            address,
            careers,
            website: self.website,
            phone: self.phone,
            email: self.email,
            housing: self.housing.unwrap_or(false),
            job_assistance: self.job_assistance.unwrap_or(false),
            job_guarantee: self.job_guarantee.unwrap_or(false),
            accept_gi: self.accept_gi.unwrap_or(false),
        })
    }
}

/// Partial update; derived fields (slug, location, averages) are not
/// accepted from clients
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBootcamp {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub careers: Option<Vec<String>>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
}

impl UpdateBootcamp {
    pub fn validate(&self) -> HashMap<String, String> {
        let mut errors = HashMap::new();

        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                violation(&mut errors, "name", "Please add a name");
            } else if name.len() > 50 {
                violation(&mut errors, "name", "Name can not be more than 50 characters");
            }
        }
        if let Some(description) = &self.description {
            if description.trim().is_empty() {
                violation(&mut errors, "description", "Please add a description");
            } else if description.len() > 500 {
                violation(
                    &mut errors,
                    "description",
                    "Description can not be more than 500 characters",
                );
            }
        }
        if let Some(address) = &self.address {
            if address.trim().is_empty() {
                violation(&mut errors, "address", "Please add an address");
            }
        }
        if let Some(careers) = &self.careers {
            validate_careers(careers, &mut errors);
        }
        if let Some(website) = &self.website {
            if !is_valid_url(website) {
                violation(
                    &mut errors,
                    "website",
                    "Please use a valid URL with HTTP or HTTPS",
                );
            }
        }
        if let Some(phone) = &self.phone {
            if phone.len() > 20 {
                violation(
                    &mut errors,
                    "phone",
                    "Phone number can not be longer than 20 characters",
                );
            }
        }
        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                violation(&mut errors, "email", "Please add a valid email");
            }
        }

        errors
    }
}

fn validate_careers(careers: &[String], errors: &mut HashMap<String, String>) {
    if careers.is_empty() {
        violation(errors, "careers", "Please add at least one career");
        return;
    }
    for career in careers {
        if !CAREERS.contains(&career.as_str()) {
            violation(
                errors,
                "careers",
                &format!("`{}` is not a supported career", career),
            );
            return;
        }
    }
}

/// URL slug derived from the bootcamp name; never client-supplied
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CreateBootcamp {
        CreateBootcamp {
            name: Some("Devworks Bootcamp".to_string()),
            description: Some("Full stack development".to_string()),
            address: Some("233 Bay State Rd Boston MA 02215".to_string()),
            careers: Some(vec!["Web Development".to_string()]),
            website: Some("https://devworks.com".to_string()),
            phone: None,
            email: Some("enroll@devworks.com".to_string()),
            housing: Some(true),
            job_assistance: None,
            job_guarantee: None,
            accept_gi: None,
        }
    }

    #[test]
    fn valid_payload_passes() {
        let attrs = payload().validate().unwrap();
        assert_eq!(attrs.name, "Devworks Bootcamp");
        assert!(attrs.housing);
        assert!(!attrs.job_assistance);
    }

    #[test]
    fn missing_required_fields_are_reported() {
        let mut p = payload();
        p.name = None;
        p.careers = Some(vec![]);
        let errors = p.validate().unwrap_err();
        assert_eq!(errors["name"], "Please add a name");
        assert_eq!(errors["careers"], "Please add at least one career");
    }

    #[test]
    fn overlong_name_is_rejected() {
        let mut p = payload();
        p.name = Some("x".repeat(51));
        let errors = p.validate().unwrap_err();
        assert!(errors.contains_key("name"));
    }

    #[test]
    fn unknown_career_is_rejected() {
        let mut p = payload();
        p.careers = Some(vec!["Underwater Basket Weaving".to_string()]);
        assert!(p.validate().unwrap_err().contains_key("careers"));
    }

    #[test]
    fn invalid_website_is_rejected() {
        let mut p = payload();
        p.website = Some("not a url".to_string());
        assert!(p.validate().unwrap_err().contains_key("website"));
    }

    #[test]
    fn slugify_lowercases_and_dashes() {
        assert_eq!(slugify("Devworks Bootcamp"), "devworks-bootcamp");
        assert_eq!(slugify("UI/UX Experts"), "ui-ux-experts");
        assert_eq!(slugify("  Modern  Tech  "), "modern-tech");
    }
}
