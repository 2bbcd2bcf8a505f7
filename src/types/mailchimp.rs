use serde::{Deserialize, Serialize};

/// Title MailChimp uses for a 400 when the address is already on the list.
pub const MEMBER_EXISTS_TITLE: &str = "Member Exists";

/// Fields posted by the signup form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeFields {
    #[serde(rename = "FNAME")]
    pub first_name: String,
    #[serde(rename = "LNAME")]
    pub last_name: String,
}

/// Body of `POST /lists/{list_id}/members/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewMember {
    pub email_address: String,
    pub status: &'static str,
    pub merge_fields: MergeFields,
}

impl From<SignupForm> for NewMember {
    fn from(form: SignupForm) -> Self {
        Self {
            email_address: form.email,
            status: "subscribed",
            merge_fields: MergeFields {
                first_name: form.firstname,
                last_name: form.lastname,
            },
        }
    }
}

/// The part of a MailChimp problem document we look at.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MailchimpProblem {
    #[serde(default)]
    pub title: Option<String>,
}

impl MailchimpProblem {
    pub fn is_member_exists(&self) -> bool {
        self.title.as_deref() == Some(MEMBER_EXISTS_TITLE)
    }
}

/// Query string carried by the list/member proxy routes.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityQuery {
    pub email: String,
}

/// Query string of the OAuth callback.
#[derive(Debug, Deserialize)]
pub struct AuthCallbackQuery {
    pub code: Option<String>,
}
