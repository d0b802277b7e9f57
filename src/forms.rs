use std::collections::BTreeMap;

use serde::Deserialize;

use crate::entities::movie;

pub const MAX_REVIEW_CHARS: usize = 500;
pub const MAX_TITLE_CHARS: usize = 250;
pub const RATING_RANGE: std::ops::RangeInclusive<f64> = 0.0..=10.0;

/// Validation messages keyed by form field, plus an optional message for the whole form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, String>,
    form: Option<String>,
}

impl FormErrors {
    pub fn for_form(message: impl Into<String>) -> Self {
        Self { fields: BTreeMap::new(), form: Some(message.into()) }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn form(&self) -> Option<&str> {
        self.form.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.form.is_none()
    }

    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct EditForm {
    pub new_rating: String,
    pub new_review: String,
    pub csrf_token: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ValidEdit {
    pub rating: f64,
    pub review: String,
}

impl EditForm {
    pub fn prefill(movie: &movie::Model) -> Self {
        Self {
            new_rating: movie.rating.to_string(),
            new_review: movie.review.clone(),
            csrf_token: String::new(),
        }
    }

    pub fn validate(&self) -> Result<ValidEdit, FormErrors> {
        let mut errors = FormErrors::default();

        let rating = self.new_rating.trim();
        let rating = if rating.is_empty() {
            errors.add("new_rating", "Rating is required.");
            None
        } else {
            match rating.parse::<f64>() {
                Ok(r) if r.is_finite() && RATING_RANGE.contains(&r) => Some(r),
                Ok(_) => {
                    errors.add("new_rating", "Rating must be between 0 and 10.");
                    None
                },
                Err(_) => {
                    errors.add("new_rating", "Rating must be a number, e.g. 7.5.");
                    None
                },
            }
        };

        let review = self.new_review.trim();
        if review.is_empty() {
            errors.add("new_review", "Review is required.");
        } else if review.chars().count() > MAX_REVIEW_CHARS {
            errors.add(
                "new_review",
                format!("Review must be at most {MAX_REVIEW_CHARS} characters."),
            );
        }

        match rating {
            Some(rating) if errors.is_empty() => {
                Ok(ValidEdit { rating, review: review.to_string() })
            },
            _ => Err(errors),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddForm {
    pub title: String,
    pub csrf_token: String,
}

impl AddForm {
    /// Returns the trimmed title to search for.
    pub fn validate(&self) -> Result<String, FormErrors> {
        let title = self.title.trim();
        let mut errors = FormErrors::default();
        if title.is_empty() {
            errors.add("title", "Movie title is required.");
        } else if title.chars().count() > MAX_TITLE_CHARS {
            errors.add("title", format!("Title must be at most {MAX_TITLE_CHARS} characters."));
        }

        if errors.is_empty() { Ok(title.to_string()) } else { Err(errors) }
    }
}
