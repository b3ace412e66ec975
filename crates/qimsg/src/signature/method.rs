// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Full method signatures of the form `name::ret(params)`.
//!
//! The legacy colon form `name::ret:params` is still accepted; it is
//! canonicalized to the parenthesized form on parse.

use std::fmt;

use super::{Kind, Signature, SignatureError, Token};

/// A split method signature: name, return shape, parameter tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    name: String,
    returns: Signature,
    parameters: Signature,
}

impl MethodSignature {
    /// Split a full method signature into its three parts.
    pub fn parse(full: &str) -> Result<Self, SignatureError> {
        let (name, rest) = full
            .split_once("::")
            .ok_or(SignatureError::MissingSeparator)?;
        if let Some((ret, params)) = rest.split_once(':') {
            // Legacy form: parameters listed bare after ':'.
            let returns = Signature::parse(ret)?;
            if returns.len() != 1 {
                return Err(SignatureError::MethodLayout);
            }
            let params = Signature::parse(params)?;
            let parameters =
                Signature::from_tokens(vec![Token::tuple(params.iter().cloned().collect())]);
            return Ok(Self {
                name: name.to_string(),
                returns,
                parameters,
            });
        }
        let parsed = Signature::parse(rest)?;
        if parsed.len() != 2 {
            return Err(SignatureError::MethodLayout);
        }
        let params_token = parsed.token(1).expect("arity checked above");
        if params_token.kind() != Kind::Tuple {
            return Err(SignatureError::MethodLayout);
        }
        let returns = Signature::from_tokens(vec![parsed.token(0).expect("arity checked").clone()]);
        let parameters = Signature::from_tokens(vec![params_token.clone()]);
        Ok(Self {
            name: name.to_string(),
            returns,
            parameters,
        })
    }

    /// Method name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return-value signature (always a single token).
    pub fn returns(&self) -> &Signature {
        &self.returns
    }

    /// Parameter signature (always a single tuple token).
    pub fn parameters(&self) -> &Signature {
        &self.parameters
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}{}", self.name, self.returns, self.parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_paren_form() {
        let m = MethodSignature::parse("add::i(ii)").expect("parse");
        assert_eq!(m.name(), "add");
        assert_eq!(m.returns().as_str(), "i");
        assert_eq!(m.parameters().as_str(), "(ii)");
    }

    #[test]
    fn parse_legacy_colon_form() {
        let m = MethodSignature::parse("add::i:ii").expect("parse");
        assert_eq!(m.name(), "add");
        assert_eq!(m.returns().as_str(), "i");
        assert_eq!(m.parameters().as_str(), "(ii)");
        assert_eq!(m.to_string(), "add::i(ii)");
    }

    #[test]
    fn missing_separator() {
        assert_eq!(
            MethodSignature::parse("add:i(ii)").unwrap_err(),
            SignatureError::MissingSeparator
        );
    }

    #[test]
    fn bad_layout() {
        assert_eq!(
            MethodSignature::parse("add::i").unwrap_err(),
            SignatureError::MethodLayout
        );
        assert_eq!(
            MethodSignature::parse("add::(ii)i").unwrap_err(),
            SignatureError::MethodLayout
        );
    }

    #[test]
    fn void_return_empty_params() {
        let m = MethodSignature::parse("ping::v()").expect("parse");
        assert_eq!(m.returns().as_str(), "v");
        assert_eq!(m.parameters().as_str(), "()");
    }
}
