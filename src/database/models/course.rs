use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

use super::violation;

pub const TABLE: &str = "courses";

pub const COLUMNS: &[&str] = &[
    "id",
    "title",
    "description",
    "weeks",
    "tuition",
    "minimum_skill",
    "scholarship_available",
    "created_at",
    "bootcamp_id",
    "user_id",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "minimum_skill", rename_all = "lowercase")]
pub enum MinimumSkill {
    Beginner,
    Intermediate,
    Advanced,
}

impl MinimumSkill {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "beginner" => Some(MinimumSkill::Beginner),
            "intermediate" => Some(MinimumSkill::Intermediate),
            "advanced" => Some(MinimumSkill::Advanced),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub weeks: String,
    pub tuition: f64,
    pub minimum_skill: MinimumSkill,
    pub scholarship_available: bool,
    pub created_at: DateTime<Utc>,
    pub bootcamp_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub weeks: Option<String>,
    pub tuition: Option<f64>,
    pub minimum_skill: Option<String>,
    pub scholarship_available: Option<bool>,
}

/// Validated create payload, ready for storage
#[derive(Debug, Clone)]
pub struct CourseAttrs {
    pub title: String,
    pub description: String,
    pub weeks: String,
    pub tuition: f64,
    pub minimum_skill: MinimumSkill,
    pub scholarship_available: bool,
}

impl CreateCourse {
    pub fn validate(self) -> Result<CourseAttrs, HashMap<String, String>> {
        let mut errors = HashMap::new();

        let title = self.title.unwrap_or_default();
        if title.trim().is_empty() {
            violation(&mut errors, "title", "Please add a course title");
        }
        let description = self.description.unwrap_or_default();
        if description.trim().is_empty() {
            violation(&mut errors, "description", "Please add a description");
        }
        let weeks = self.weeks.unwrap_or_default();
        if weeks.trim().is_empty() {
            violation(&mut errors, "weeks", "Please add a number of weeks");
        }
        let tuition = match self.tuition {
            Some(t) if t >= 0.0 => t,
            Some(_) => {
                violation(&mut errors, "tuition", "Tuition can not be negative");
                0.0
            }
            None => {
                violation(&mut errors, "tuition", "Please add a tuition cost");
                0.0
            }
        };
        let minimum_skill = match self.minimum_skill.as_deref().map(MinimumSkill::parse) {
            Some(Some(skill)) => skill,
            Some(None) => {
                violation(
                    &mut errors,
                    "minimumSkill",
                    "Minimum skill must be one of beginner, intermediate, advanced",
                );
                MinimumSkill::Beginner
            }
            None => {
                violation(&mut errors, "minimumSkill", "Please add a minimum skill");
                MinimumSkill::Beginner
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(CourseAttrs {
            title,
            description,
            weeks,
            tuition,
            minimum_skill,
            scholarship_available: self.scholarship_available.unwrap_or(false),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub weeks: Option<String>,
    pub tuition: Option<f64>,
    pub minimum_skill: Option<String>,
    pub scholarship_available: Option<bool>,
}

impl UpdateCourse {
    pub fn validate(&self) -> Result<Option<MinimumSkill>, HashMap<String, String>> {
        let mut errors = HashMap::new();

        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                violation(&mut errors, "title", "Please add a course title");
            }
        }
        if let Some(description) = &self.description {
            if description.trim().is_empty() {
                violation(&mut errors, "description", "Please add a description");
            }
        }
        if let Some(tuition) = self.tuition {
            if tuition < 0.0 {
                violation(&mut errors, "tuition", "Tuition can not be negative");
            }
        }
        let minimum_skill = match self.minimum_skill.as_deref() {
            Some(raw) => match MinimumSkill::parse(raw) {
                Some(skill) => Some(skill),
                None => {
                    violation(
                        &mut errors,
                        "minimumSkill",
                        "Minimum skill must be one of beginner, intermediate, advanced",
                    );
                    None
                }
            },
            None => None,
        };

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(minimum_skill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CreateCourse {
        CreateCourse {
            title: Some("Front End Web Development".to_string()),
            description: Some("HTML, CSS, JavaScript".to_string()),
            weeks: Some("8".to_string()),
            tuition: Some(8000.0),
            minimum_skill: Some("beginner".to_string()),
            scholarship_available: None,
        }
    }

    #[test]
    fn valid_payload_passes() {
        let attrs = payload().validate().unwrap();
        assert_eq!(attrs.minimum_skill, MinimumSkill::Beginner);
        assert!(!attrs.scholarship_available);
    }

    #[test]
    fn missing_tuition_is_reported() {
        let mut p = payload();
        p.tuition = None;
        let errors = p.validate().unwrap_err();
        assert_eq!(errors["tuition"], "Please add a tuition cost");
    }

    #[test]
    fn unknown_skill_is_rejected() {
        let mut p = payload();
        p.minimum_skill = Some("wizard".to_string());
        assert!(p.validate().unwrap_err().contains_key("minimumSkill"));
    }

    #[test]
    fn update_accepts_partial_payload() {
        let update = UpdateCourse {
            title: None,
            description: None,
            weeks: None,
            tuition: Some(9500.0),
            minimum_skill: Some("advanced".to_string()),
            scholarship_available: None,
        };
        assert_eq!(update.validate().unwrap(), Some(MinimumSkill::Advanced));
    }
}
