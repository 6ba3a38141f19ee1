// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generic single-field wizard step.
//!
//! A [`Step`] bundles everything needed to accept one input: how to parse
//! it, the bounds and check that validate it, and where to store it. Steps
//! are plain data; sequencing lives in [`crate::transitions`].

use cinelist_core::{Field, Notice, Session};

/// How the answered step influences the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    /// A value was stored.
    Value,
    Skipped,
    /// A yes/no step answered yes.
    Yes,
    No,
}

/// Values a step can produce.
pub trait StepValue {
    /// Yes/no steps take button answers and show no bounds.
    const CHOICE: bool = false;

    fn answer(&self) -> Answer {
        Answer::Value
    }
}

impl StepValue for String {}
impl StepValue for i32 {}
impl StepValue for u32 {}
impl StepValue for f32 {}
impl StepValue for (f64, f64) {}

impl StepValue for bool {
    const CHOICE: bool = true;

    fn answer(&self) -> Answer {
        if *self { Answer::Yes } else { Answer::No }
    }
}

/// One awaited input of type `T` with bounds of type `N`.
pub struct Step<T, N> {
    pub field: Field,
    pub min: N,
    pub max: N,
    pub skippable: bool,
    pub parse: fn(&str) -> Option<T>,
    pub validate: fn(&T, N, N) -> bool,
    pub set: fn(&mut Session, T),
}

impl<T, N> Step<T, N> {
    pub fn new(
        field: Field,
        (min, max): (N, N),
        parse: fn(&str) -> Option<T>,
        validate: fn(&T, N, N) -> bool,
        set: fn(&mut Session, T),
    ) -> Self {
        Self {
            field,
            min,
            max,
            skippable: false,
            parse,
            validate,
            set,
        }
    }

    pub fn skippable(mut self, skippable: bool) -> Self {
        self.skippable = skippable;
        self
    }
}

/// Object-safe view of a [`Step`] so the step table can hold mixed types.
pub trait WizardStep: Send + Sync {
    fn field(&self) -> Field;

    fn skippable(&self) -> bool;

    /// Inclusive bounds for prompts and warnings; `None` for yes/no steps.
    fn bounds(&self) -> Option<(f64, f64)>;

    fn is_choice(&self) -> bool;

    /// Parses, validates and stores `input`. On failure nothing is stored
    /// and the returned notice explains why.
    fn accept(&self, session: &mut Session, input: &str) -> Result<Answer, Notice>;
}

impl<T, N> WizardStep for Step<T, N>
where
    T: StepValue,
    N: Copy + Into<f64> + Send + Sync,
{
    fn field(&self) -> Field {
        self.field
    }

    fn skippable(&self) -> bool {
        self.skippable
    }

    fn bounds(&self) -> Option<(f64, f64)> {
        (!T::CHOICE).then(|| (self.min.into(), self.max.into()))
    }

    fn is_choice(&self) -> bool {
        T::CHOICE
    }

    fn accept(&self, session: &mut Session, input: &str) -> Result<Answer, Notice> {
        let value = (self.parse)(input).ok_or(Notice::InvalidFormat { field: self.field })?;
        if !(self.validate)(&value, self.min, self.max) {
            return Err(Notice::OutOfBounds {
                field: self.field,
                min: self.min.into(),
                max: self.max.into(),
            });
        }
        let answer = value.answer();
        (self.set)(session, value);
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{any, length_within, parse_number, parse_text, parse_yes_no, within};

    fn session() -> Session {
        Session::new("1", "en", 5)
    }

    #[test]
    fn stores_valid_input() {
        let step = Step::new(
            Field::Year,
            (1888, 2100),
            parse_number::<i32>,
            within,
            |s: &mut Session, v: i32| s.film_detail.draft.year = Some(v),
        );
        let mut session = session();
        assert_eq!(step.accept(&mut session, "1979"), Ok(Answer::Value));
        assert_eq!(session.film_detail.draft.year, Some(1979));
        assert_eq!(step.bounds(), Some((1888.0, 2100.0)));
    }

    #[test]
    fn rejects_without_storing() {
        let step = Step::new(
            Field::Title,
            (1u32, 5u32),
            parse_text,
            length_within,
            |s: &mut Session, v: String| s.film_detail.draft.title = Some(v),
        );
        let mut session = session();
        assert_eq!(
            step.accept(&mut session, "Too long"),
            Err(Notice::OutOfBounds {
                field: Field::Title,
                min: 1.0,
                max: 5.0
            })
        );
        assert_eq!(
            step.accept(&mut session, "  "),
            Err(Notice::InvalidFormat { field: Field::Title })
        );
        assert!(session.film_detail.draft.title.is_none());
    }

    #[test]
    fn choice_steps_report_their_answer() {
        let step = Step::new(
            Field::Viewed,
            (0u8, 1u8),
            parse_yes_no,
            any,
            |s: &mut Session, v: bool| s.film_detail.draft.is_viewed = Some(v),
        );
        let mut session = session();
        assert!(step.is_choice());
        assert_eq!(step.bounds(), None);
        assert_eq!(step.accept(&mut session, "no"), Ok(Answer::No));
        assert_eq!(session.film_detail.draft.is_viewed, Some(false));
        assert_eq!(step.accept(&mut session, "yes"), Ok(Answer::Yes));
    }
}
