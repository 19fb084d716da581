//! Printable copy of a submitted board nomination.

use chrono::NaiveDate;
use serde::Serialize;
use tera::{Context, Tera};

use crate::model::BoardNomination;

const TEMPLATE_NAME: &str = "nomination_receipt.html";

const TEMPLATE: &str = r#"<article class="receipt">
  <header>
    <h1>Board Member Nomination Application</h1>
    <p>{{ organization }}</p>
    <p>Submitted on {{ submitted_on }}</p>
  </header>

  <section>
    <h2>Nominee Information</h2>
    <dl>
      <dt>Full Name:</dt><dd>{{ n.nominee_name }}</dd>
      <dt>Email:</dt><dd>{{ n.nominee_email }}</dd>
      <dt>Phone:</dt><dd>{{ n.nominee_phone }}</dd>
      <dt>Unit Address:</dt><dd>{{ n.nominee_unit_address }}</dd>
      <dt>Years at Property:</dt><dd>{{ years }}</dd>
      <dt>Ownership Status:</dt><dd>{{ n.ownership_type }}</dd>
    </dl>
  </section>

  <section>
    <h2>Professional Background</h2>
    <dl>
      <dt>Current Employment/Profession:</dt><dd>{{ n.current_employment | default(value="Not provided") }}</dd>
      <dt>Previous Board or Leadership Experience:</dt><dd class="pre">{{ n.previous_board_experience | default(value="Not provided") }}</dd>
      <dt>Relevant Skills &amp; Expertise:</dt><dd class="pre">{{ n.relevant_skills }}</dd>
    </dl>
  </section>

  <section>
    <h2>Motivation &amp; Commitment</h2>
    <dl>
      <dt>Why do you want to serve on the board?</dt><dd class="pre">{{ n.motivation }}</dd>
      <dt>Can you commit to attending monthly board meetings?</dt><dd>{{ n.time_commitment }}</dd>
{%- if n.references %}
      <dt>References:</dt><dd class="pre">{{ n.references }}</dd>
{%- endif %}
    </dl>
  </section>

  <section>
    <h2>Signature</h2>
    <p>Applicant Signature:</p>
    <p class="signature">{{ n.signature }}</p>
  </section>

  <section>
    <h2>Acknowledgements</h2>
    <ul>
      <li>I understand that board members have fiduciary duties to the association and must act in the best interests of all owners.</li>
      <li>I understand that serving on the board requires a significant time commitment.</li>
      <li>I certify that the information provided is true and accurate.</li>
    </ul>
  </section>
</article>
"#;

/// Blank strings render as absent so `default(...)` filters apply.
#[derive(Serialize)]
struct ReceiptView<'a> {
    nominee_name: &'a str,
    nominee_email: &'a str,
    nominee_phone: &'a str,
    nominee_unit_address: &'a str,
    ownership_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_employment: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_board_experience: Option<&'a str>,
    relevant_skills: &'a str,
    motivation: &'a str,
    time_commitment: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    references: Option<&'a str>,
    signature: &'a str,
}

fn non_blank(value: &str) -> Option<&str> {
    (!value.trim().is_empty()).then_some(value)
}

/// Renders the read-only receipt shown after a nomination is accepted.
pub struct ReceiptRenderer {
    tera: Tera,
    organization: String,
}

impl ReceiptRenderer {
    pub fn new(organization: impl Into<String>) -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;
        Ok(Self {
            tera,
            organization: organization.into(),
        })
    }

    /// Render `nomination` as escaped HTML for printing.
    pub fn render(
        &self,
        nomination: &BoardNomination,
        submitted_on: NaiveDate,
    ) -> Result<String, tera::Error> {
        let view = ReceiptView {
            nominee_name: &nomination.nominee_name,
            nominee_email: &nomination.nominee_email,
            nominee_phone: &nomination.nominee_phone,
            nominee_unit_address: &nomination.nominee_unit_address,
            ownership_type: nomination.ownership_type.as_str(),
            current_employment: non_blank(&nomination.current_employment),
            previous_board_experience: non_blank(&nomination.previous_board_experience),
            relevant_skills: &nomination.relevant_skills,
            motivation: &nomination.motivation,
            time_commitment: nomination.time_commitment.as_str(),
            references: non_blank(&nomination.references),
            signature: &nomination.signature,
        };

        let years = nomination
            .years_at_property
            .map(|y| y.to_string())
            .unwrap_or_default();

        let mut context = Context::new();
        context.insert("n", &view);
        context.insert("years", &years);
        context.insert("organization", &self.organization);
        context.insert("submitted_on", &submitted_on.format("%B %-d, %Y").to_string());

        self.tera.render(TEMPLATE_NAME, &context)
    }
}
