//! Handler return values and their normalization into [`Outcome`].

use cmdbind_types::outcome::Outcome;

/// What a handler may return.
///
/// Normalization rules, in order: an outcome passes through unchanged, a
/// number becomes a success with that code, text becomes a success carrying
/// the message, a boolean is success iff true, anything else is a plain
/// success.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Outcome(Outcome),
    Number(i64),
    Text(String),
    Bool(bool),
    Unit,
}

impl Reply {
    pub fn into_outcome(self) -> Outcome {
        match self {
            Self::Outcome(o) => o,
            Self::Number(n) => Outcome::code(n),
            Self::Text(msg) => Outcome::success_with(msg),
            Self::Bool(ok) => Outcome::from_bool(ok),
            Self::Unit => Outcome::success(),
        }
    }
}

impl From<Outcome> for Reply {
    fn from(o: Outcome) -> Self {
        Self::Outcome(o)
    }
}

impl From<i64> for Reply {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Reply {
    fn from(n: i32) -> Self {
        Self::Number(i64::from(n))
    }
}

impl From<String> for Reply {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Reply {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<bool> for Reply {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<()> for Reply {
    fn from(_: ()) -> Self {
        Self::Unit
    }
}

impl<T: Into<Reply>> From<Option<T>> for Reply {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Unit, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_passes_through() {
        let o = Outcome::fail_with("min > max");
        assert_eq!(Reply::from(o.clone()).into_outcome(), o);
    }

    #[test]
    fn number_becomes_code() {
        let o = Reply::from(17).into_outcome();
        assert!(o.success);
        assert_eq!(o.code, 17);
    }

    #[test]
    fn text_becomes_message() {
        let o = Reply::from("rolled").into_outcome();
        assert!(o.success);
        assert_eq!(o.code, 1);
        assert_eq!(o.message.as_deref(), Some("rolled"));
    }

    #[test]
    fn bool_sets_success() {
        assert!(Reply::from(true).into_outcome().success);
        assert!(!Reply::from(false).into_outcome().success);
    }

    #[test]
    fn unit_and_none_are_plain_success() {
        assert_eq!(Reply::from(()).into_outcome(), Outcome::success());
        assert_eq!(Reply::from(None::<i64>).into_outcome(), Outcome::success());
        assert_eq!(Reply::from(Some(3)).into_outcome(), Outcome::code(3));
    }
}
