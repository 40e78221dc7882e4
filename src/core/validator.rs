use crate::core::{NormalizedSubmission, Submission};
use crate::utils::error::{RelayError, Result};
use crate::utils::validation::is_valid_email;
use lettre::message::Mailbox;
use serde_json::Value;

/// 非字串或修剪後為空都算缺漏
fn trimmed(value: &Option<Value>) -> Option<&str> {
    match value {
        Some(Value::String(s)) => {
            let s = s.trim();
            (!s.is_empty()).then_some(s)
        }
        _ => None,
    }
}

pub fn validate(raw: &Submission) -> Result<NormalizedSubmission> {
    let name = trimmed(&raw.name);
    let email = trimmed(&raw.email);
    let query = trimmed(&raw.query);

    let missing: Vec<String> = [("name", name), ("email", email), ("query", query)]
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(field, _)| field.to_string())
        .collect();

    let (Some(name), Some(email), Some(query)) = (name, email, query) else {
        return Err(RelayError::MissingField { fields: missing });
    };

    // 寄送時 Reply-To 要能被 lettre 解析，在取得 token 之前擋下
    if !is_valid_email(email) || email.parse::<Mailbox>().is_err() {
        return Err(RelayError::InvalidEmailFormat {
            value: email.to_string(),
        });
    }

    Ok(NormalizedSubmission::new_unchecked(
        name.to_string(),
        email.to_string(),
        query.to_string(),
    ))
}
