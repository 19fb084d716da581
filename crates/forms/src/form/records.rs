//! [`FormRecord`] for each submission schema.

use super::validate::Validator;
use super::{FieldError, FieldInput, FormRecord, ValidationErrors};
use crate::model::{
    BoardNomination, ContactSubmission, FormType, ViolationReport, ViolationType,
};

impl FormRecord for ContactSubmission {
    const FORM_TYPE: FormType = FormType::Contact;

    fn defaults() -> Self {
        Self::default()
    }

    fn set_field(&mut self, name: &str, input: FieldInput) -> Result<(), FieldError> {
        match name {
            "name" => self.name = input.into_text(name)?,
            "email" => self.email = input.into_text(name)?,
            "phone" => self.phone = input.into_optional_text(name)?,
            "company" => self.company = input.into_optional_text(name)?,
            "inquiry_type" => self.inquiry_type = input.into_choice(name)?,
            "property_address" => self.property_address = input.into_optional_text(name)?,
            "number_of_units" => self.number_of_units = input.into_optional_choice(name)?,
            "board_position" => self.board_position = input.into_optional_choice(name)?,
            "years_at_property" => self.years_at_property = input.into_optional_choice(name)?,
            "previous_experience" => {
                self.previous_experience = input.into_optional_choice(name)?;
            }
            "message" => self.message = input.into_text(name)?,
            other => return Err(FieldError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.required("name", &self.name).email("email", &self.email);

        if self.is_board_nomination() {
            v.required_opt("property_address", self.property_address.as_ref());
        }
        v.at_least("number_of_units", self.number_of_units, 1);
        if self.is_board_nomination() {
            v.required_opt("board_position", self.board_position.as_ref())
                .required_opt("years_at_property", self.years_at_property.as_ref());
        }

        v.required("message", &self.message).finish()
    }
}

impl FormRecord for ViolationReport {
    const FORM_TYPE: FormType = FormType::Violation;

    fn defaults() -> Self {
        Self::default()
    }

    fn set_field(&mut self, name: &str, input: FieldInput) -> Result<(), FieldError> {
        match name {
            "reporter_name" => self.reporter_name = input.into_text(name)?,
            "reporter_unit_address" => self.reporter_unit_address = input.into_text(name)?,
            "reporter_contact" => self.reporter_contact = input.into_text(name)?,
            "report_date" => self.report_date = input.into_choice(name)?,
            "violator_name" => self.violator_name = input.into_optional_text(name)?,
            "violator_unit" => self.violator_unit = input.into_optional_text(name)?,
            "violation_types" => {
                let (value, checked) = match input {
                    FieldInput::Toggle { value, checked } => (value, checked),
                    other => return Err(FieldError::wrong_input(name, &other)),
                };
                let violation: ViolationType =
                    value.parse().map_err(|e| FieldError::invalid(name, e))?;
                if checked {
                    self.violation_types.check(violation);
                } else {
                    self.violation_types.uncheck(violation);
                }
            }
            "violation_details" => self.violation_details = input.into_text(name)?,
            "reported_before" => self.reported_before = input.into_choice(name)?,
            "requested_action" => self.requested_action = input.into_choice(name)?,
            "signature" => self.signature = input.into_text(name)?,
            "acknowledged_sharing" => self.acknowledged_sharing = input.into_checked(name)?,
            "certified_accurate" => self.certified_accurate = input.into_checked(name)?,
            "acknowledged_contact" => self.acknowledged_contact = input.into_checked(name)?,
            other => return Err(FieldError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .required("reporter_name", &self.reporter_name)
            .required("reporter_unit_address", &self.reporter_unit_address)
            .required("reporter_contact", &self.reporter_contact)
            .selected("violation_types", self.violation_types.is_empty())
            .required("violation_details", &self.violation_details)
            .required("signature", &self.signature)
            .accepted("acknowledged_sharing", self.acknowledged_sharing)
            .accepted("certified_accurate", self.certified_accurate)
            .accepted("acknowledged_contact", self.acknowledged_contact)
            .finish()
    }
}

impl FormRecord for BoardNomination {
    const FORM_TYPE: FormType = FormType::BoardNomination;
    const KEEPS_RECEIPT: bool = true;

    fn defaults() -> Self {
        Self::default()
    }

    fn set_field(&mut self, name: &str, input: FieldInput) -> Result<(), FieldError> {
        match name {
            "nominee_name" => self.nominee_name = input.into_text(name)?,
            "nominee_email" => self.nominee_email = input.into_text(name)?,
            "nominee_phone" => self.nominee_phone = input.into_text(name)?,
            "nominee_unit_address" => self.nominee_unit_address = input.into_text(name)?,
            "years_at_property" => self.years_at_property = input.into_optional_choice(name)?,
            "ownership_type" => self.ownership_type = input.into_choice(name)?,
            "current_employment" => self.current_employment = input.into_text(name)?,
            "previous_board_experience" => {
                self.previous_board_experience = input.into_text(name)?;
            }
            "relevant_skills" => self.relevant_skills = input.into_text(name)?,
            "motivation" => self.motivation = input.into_text(name)?,
            "time_commitment" => self.time_commitment = input.into_choice(name)?,
            "references" => self.references = input.into_text(name)?,
            "signature" => self.signature = input.into_text(name)?,
            "acknowledged_terms" => self.acknowledged_terms = input.into_checked(name)?,
            "acknowledged_commitment" => {
                self.acknowledged_commitment = input.into_checked(name)?;
            }
            "acknowledged_attendance" => {
                self.acknowledged_attendance = input.into_checked(name)?;
            }
            other => return Err(FieldError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .required("nominee_name", &self.nominee_name)
            .email("nominee_email", &self.nominee_email)
            .required("nominee_phone", &self.nominee_phone)
            .required("nominee_unit_address", &self.nominee_unit_address)
            .required_opt("years_at_property", self.years_at_property.as_ref())
            .required("relevant_skills", &self.relevant_skills)
            .required("motivation", &self.motivation)
            .required("signature", &self.signature)
            .accepted("acknowledged_terms", self.acknowledged_terms)
            .accepted("acknowledged_commitment", self.acknowledged_commitment)
            .accepted("acknowledged_attendance", self.acknowledged_attendance)
            .finish()
    }
}
