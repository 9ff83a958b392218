// ABOUTME: Region lookup from the process environment.
// ABOUTME: AWS_REGION wins over AWS_DEFAULT_REGION; blank values count as unset.

pub const REGION_VARS: [&str; 2] = ["AWS_REGION", "AWS_DEFAULT_REGION"];

/// First non-blank region variable, if any.
pub fn resolve_region() -> Option<String> {
    REGION_VARS.iter().find_map(|var| {
        std::env::var(var)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aws_region_takes_precedence() {
        temp_env::with_vars(
            [
                ("AWS_REGION", Some("eu-west-1")),
                ("AWS_DEFAULT_REGION", Some("us-east-1")),
            ],
            || assert_eq!(resolve_region().as_deref(), Some("eu-west-1")),
        );
    }

    #[test]
    fn default_region_is_fallback() {
        temp_env::with_vars(
            [("AWS_REGION", Some("  ")), ("AWS_DEFAULT_REGION", Some("ap-northeast-1"))],
            || assert_eq!(resolve_region().as_deref(), Some("ap-northeast-1")),
        );
    }

    #[test]
    fn nothing_set_is_none() {
        temp_env::with_vars_unset(REGION_VARS, || assert_eq!(resolve_region(), None));
    }
}
