//! JSON Schema documents for request validation
//!
//! The same schema documents are embedded in `add`/`edit` hypermedia controls
//! and used to validate incoming POST/PUT bodies, so a client that fills in a
//! control's schema is guaranteed to pass the server-side check.

use jsonschema::Validator;
use once_cell::sync::Lazy;
use serde_json::{json, Value};

pub static USER_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "required": ["username", "email", "password"],
        "properties": {
            "username": {
                "description": "Unique name identifying the user",
                "type": "string",
                "minLength": 1
            },
            "email": {
                "description": "The user's e-mail address",
                "type": "string",
                "pattern": "^[^@\\s]+@[^@\\s]+\\.[^@\\s.]+$"
            },
            "password": {
                "description": "SHA-256 hash of the user's password",
                "type": "string",
                "pattern": "^[a-f0-9]{64}$"
            }
        }
    })
});

pub static ALBUM_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "required": ["unique_name", "title", "artist"],
        "properties": {
            "unique_name": {
                "description": "Unique, URL-friendly name for the album",
                "type": "string",
                "minLength": 1
            },
            "title": {
                "description": "Album title",
                "type": "string",
                "minLength": 1
            },
            "artist": {
                "description": "Performing artist",
                "type": "string",
                "minLength": 1
            },
            "release": {
                "description": "Publication date of the album",
                "type": "string",
                "pattern": "^\\d{4}-\\d{2}-\\d{2}$"
            },
            "duration": {
                "description": "Total playing time of the album",
                "type": "string",
                "pattern": "^\\d{2}:\\d{2}:\\d{2}$"
            },
            "genre": {
                "description": "Musical genre of the album",
                "type": "string"
            }
        }
    })
});

pub static REVIEW_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "required": ["user", "title", "content", "star_rating"],
        "properties": {
            "user": {
                "description": "Username of the review's author",
                "type": "string",
                "minLength": 1
            },
            "title": {
                "description": "Title of the review",
                "type": "string",
                "minLength": 1
            },
            "content": {
                "description": "Textual contents of the review",
                "type": "string"
            },
            "star_rating": {
                "description": "Rating from one to five stars",
                "type": "integer",
                "minimum": 1,
                "maximum": 5
            }
        }
    })
});

/// Query-parameter vocabulary for the review collection, embedded in the
/// templated `spinrate:reviews-all` control
pub static REVIEW_QUERY_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "required": [],
        "properties": {
            "filterby": {
                "description": "Selects the feature on which the filtering of the returned reviews is based",
                "type": "string",
                "default": "album",
                "enum": ["album", "artist", "genre", "user"]
            },
            "searchword": {
                "description": "The search word used with the filterby feature",
                "type": "string"
            },
            "timeframe": {
                "description": "Timeframe in which returned reviews should have been submitted (ddmmyyyy or ddmmyyyy_ddmmyyyy)",
                "type": "string"
            },
            "nlatest": {
                "description": "How many of the latest matching reviews to return",
                "type": "number"
            }
        }
    })
});

static USER_VALIDATOR: Lazy<Validator> =
    Lazy::new(|| jsonschema::validator_for(&USER_SCHEMA).expect("user schema compiles"));
static ALBUM_VALIDATOR: Lazy<Validator> =
    Lazy::new(|| jsonschema::validator_for(&ALBUM_SCHEMA).expect("album schema compiles"));
static REVIEW_VALIDATOR: Lazy<Validator> =
    Lazy::new(|| jsonschema::validator_for(&REVIEW_SCHEMA).expect("review schema compiles"));

fn check(validator: &Validator, instance: &Value) -> Result<(), String> {
    validator
        .validate(instance)
        .map_err(|err| err.to_string())
}

/// Validate a user representation, returning the first violation as text
pub fn validate_user(instance: &Value) -> Result<(), String> {
    check(&USER_VALIDATOR, instance)
}

/// Validate an album representation, returning the first violation as text
pub fn validate_album(instance: &Value) -> Result<(), String> {
    check(&ALBUM_VALIDATOR, instance)
}

/// Validate a review representation, returning the first violation as text
pub fn validate_review(instance: &Value) -> Result<(), String> {
    check(&REVIEW_VALIDATOR, instance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_doc() -> Value {
        json!({
            "username": "itsame",
            "email": "itm@gmail.com",
            "password": "9294ab38039f60d2ec53822fb46b52c663af7ea478f4d17bf43da44ede5e166c"
        })
    }

    #[test]
    fn test_valid_user_passes() {
        assert!(validate_user(&user_doc()).is_ok());
    }

    #[test]
    fn test_user_missing_fields_fail() {
        for field in ["username", "email", "password"] {
            let mut doc = user_doc();
            doc.as_object_mut().unwrap().remove(field);
            assert!(validate_user(&doc).is_err(), "{} should be required", field);
        }
    }

    #[test]
    fn test_user_bad_emails_fail() {
        for email in ["a", "a@a", "a@a.", "@.com", "a b@c.com"] {
            let mut doc = user_doc();
            doc["email"] = json!(email);
            assert!(validate_user(&doc).is_err(), "{} should be rejected", email);
        }
    }

    #[test]
    fn test_user_bad_password_fails() {
        let mut doc = user_doc();
        doc["password"] = json!("a".repeat(65));
        assert!(validate_user(&doc).is_err());
        doc["password"] = json!("a".repeat(6));
        assert!(validate_user(&doc).is_err());
    }

    #[test]
    fn test_album_optional_field_patterns() {
        let mut doc = json!({
            "unique_name": "stc",
            "title": "STC",
            "artist": "Horna"
        });
        assert!(validate_album(&doc).is_ok());

        doc["release"] = json!("2004-12-05");
        doc["duration"] = json!("01:02:03");
        assert!(validate_album(&doc).is_ok());

        doc["release"] = json!("05-12-2004");
        assert!(validate_album(&doc).is_err());

        doc["release"] = json!("2004-12-05");
        doc["duration"] = json!("120");
        assert!(validate_album(&doc).is_err());
    }

    #[test]
    fn test_review_star_rating_bounds() {
        let mut doc = json!({
            "user": "admin",
            "title": "Finally some good black metal!",
            "content": "I really like this album :)",
            "star_rating": 5
        });
        assert!(validate_review(&doc).is_ok());

        for rating in [0, 6, -1] {
            doc["star_rating"] = json!(rating);
            assert!(validate_review(&doc).is_err(), "{} should be rejected", rating);
        }

        doc["star_rating"] = json!(3.5);
        assert!(validate_review(&doc).is_err());
    }
}
