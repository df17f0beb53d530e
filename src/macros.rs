macro_rules! str {
    ($s:expr) => {
        $s.to_string()
    };
}

/// Unwraps a nested resolution, or returns from the enclosing resolve
/// function with the failure attributed to `$codec` / `$field`.
macro_rules! field {
    ($res:expr, $codec:expr, $field:literal) => {
        match $res {
            Ok(x) => x,
            Err(cause) => {
                return Ok(Err($crate::resolution::FailureReason::field(
                    $codec, $field, cause,
                )))
            }
        }
    };
}

/// Like `field!`, but for a failure that stands on its own.
macro_rules! unless {
    ($ex:expr, else $reason:expr) => {
        match $ex {
            Some(x) => x,
            _ => return Ok(Err($reason)),
        }
    };
}
