use crate::core::{NormalizedSubmission, OutboundMessage};
use maud::{html, Markup};

/// 各行之間插入 `<br>`；`\r\n`、`\n`、`\r` 都算換行
fn html_body(name: &str, email: &str, query: &str) -> Markup {
    let query = query.replace("\r\n", "\n");
    html! {
        p { strong { "Name:" } " " (name) }
        p { strong { "Email:" } " " (email) }
        p {
            strong { "Query:" }
            br;
            @for (i, line) in query.split(['\n', '\r']).enumerate() {
                @if i > 0 { br; }
                (line)
            }
        }
    }
}

/// 收件人固定為營運信箱，提交者地址只放在 Reply-To
pub fn compose(submission: &NormalizedSubmission, operator: &str) -> OutboundMessage {
    let name = submission.name();
    let email = submission.email();
    let query = submission.query();

    OutboundMessage {
        from: operator.to_string(),
        to: operator.to_string(),
        reply_to: email.to_string(),
        subject: format!("Support Query from {}", name),
        text_body: format!("Name: {}\nEmail: {}\n\nQuery:\n{}", name, email, query),
        html_body: html_body(name, email, query).into_string(),
    }
}
