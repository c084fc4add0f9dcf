use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

use super::violation;

pub const TABLE: &str = "reviews";

pub const COLUMNS: &[&str] = &[
    "id",
    "title",
    "text",
    "rating",
    "created_at",
    "bootcamp_id",
    "user_id",
];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub bootcamp_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReview {
    pub title: Option<String>,
    pub text: Option<String>,
    pub rating: Option<f64>,
}

/// Validated create payload, ready for storage
#[derive(Debug, Clone)]
pub struct ReviewAttrs {
    pub title: String,
    pub text: String,
    pub rating: f64,
}

impl CreateReview {
    pub fn validate(self) -> Result<ReviewAttrs, HashMap<String, String>> {
        let mut errors = HashMap::new();

        let title = self.title.unwrap_or_default();
        if title.trim().is_empty() {
            violation(&mut errors, "title", "Please add a title for the review");
        } else if title.len() > 100 {
            violation(
                &mut errors,
                "title",
                "Title can not be more than 100 characters",
            );
        }
        let text = self.text.unwrap_or_default();
        if text.trim().is_empty() {
            violation(&mut errors, "text", "Please add some text");
        }
        let rating = match self.rating {
            Some(r) if (1.0..=10.0).contains(&r) => r,
            Some(_) => {
                violation(
                    &mut errors,
                    "rating",
                    "Rating must be between one and ten",
                );
                0.0
            }
            None => {
                violation(
                    &mut errors,
                    "rating",
                    "Please add a rating between one and ten",
                );
                0.0
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ReviewAttrs {
            title,
            text,
            rating,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReview {
    pub title: Option<String>,
    pub text: Option<String>,
    pub rating: Option<f64>,
}

impl UpdateReview {
    pub fn validate(&self) -> HashMap<String, String> {
        let mut errors = HashMap::new();

        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                violation(&mut errors, "title", "Please add a title for the review");
            } else if title.len() > 100 {
                violation(
                    &mut errors,
                    "title",
                    "Title can not be more than 100 characters",
                );
            }
        }
        if let Some(text) = &self.text {
            if text.trim().is_empty() {
                violation(&mut errors, "text", "Please add some text");
            }
        }
        if let Some(rating) = self.rating {
            if !(1.0..=10.0).contains(&rating) {
                violation(
                    &mut errors,
                    "rating",
                    "Rating must be between one and ten",
                );
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds_are_enforced() {
        let review = CreateReview {
            title: Some("Great course".to_string()),
            text: Some("Learned a lot".to_string()),
            rating: Some(11.0),
        };
        let errors = review.validate().unwrap_err();
        assert_eq!(errors["rating"], "Rating must be between one and ten");
    }

    #[test]
    fn valid_review_passes() {
        let review = CreateReview {
            title: Some("Great course".to_string()),
            text: Some("Learned a lot".to_string()),
            rating: Some(8.0),
        };
        let attrs = review.validate().unwrap();
        assert_eq!(attrs.rating, 8.0);
    }

    #[test]
    fn overlong_title_is_rejected() {
        let review = CreateReview {
            title: Some("x".repeat(101)),
            text: Some("ok".to_string()),
            rating: Some(5.0),
        };
        assert!(review.validate().unwrap_err().contains_key("title"));
    }
}
