// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Public allow-list: `(method, path)` pairs exempt from authentication.
//!
//! Patterns are Ant-style: `*` matches exactly one path segment and a
//! trailing `**` matches any remaining segments, including none
//! (`/products/**` matches `/products` and `/products/1/images`).

use axum::http::Method;

/// Reachable with any method, without a token.
pub const PUBLIC_PATHS: &[&str] = &["/login", "/health", "/health/**"];

/// Catalog and location reads are open to everyone.
pub const PUBLIC_GET_PATHS: &[&str] = &["/products/**", "/categories/**", "/states/**"];

/// Anyone may register as a new customer or ask for a new password.
pub const PUBLIC_POST_PATHS: &[&str] = &["/customers", "/auth/forgot/**"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `*`
    Any,
    /// `**`
    Rest,
}

/// Parsed Ant-style path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = split_path(pattern)
            .map(|segment| match segment {
                "**" => Segment::Rest,
                "*" => Segment::Any,
                literal => Segment::Literal(literal.to_string()),
            })
            .collect();
        Self { segments }
    }

    pub fn matches(&self, path: &str) -> bool {
        let path: Vec<&str> = split_path(path).collect();
        match_segments(&self.segments, &path)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match (pattern.split_first(), path.split_first()) {
        (None, _) => path.is_empty(),
        (Some((Segment::Rest, _)), _) => true,
        (Some(_), None) => false,
        (Some((Segment::Any, rest)), Some((_, remaining))) => match_segments(rest, remaining),
        (Some((Segment::Literal(literal), rest)), Some((head, remaining))) => {
            literal.as_str() == *head && match_segments(rest, remaining)
        }
    }
}

#[derive(Debug, Clone)]
struct PublicRule {
    /// `None` matches every method
    method: Option<Method>,
    pattern: PathPattern,
}

/// Read-only set of public rules, shared by all requests.
#[derive(Debug, Clone, Default)]
pub struct AccessRules {
    rules: Vec<PublicRule>,
}

impl AccessRules {
    /// Rules with nothing public.
    pub fn new() -> Self {
        Self::default()
    }

    /// The storefront allow-list.
    pub fn storefront() -> Self {
        Self::new()
            .permit_all(PUBLIC_PATHS)
            .permit(Method::GET, PUBLIC_GET_PATHS)
            .permit(Method::POST, PUBLIC_POST_PATHS)
    }

    /// Open `patterns` to every method.
    pub fn permit_all(mut self, patterns: &[&str]) -> Self {
        self.rules.extend(patterns.iter().map(|pattern| PublicRule {
            method: None,
            pattern: PathPattern::parse(pattern),
        }));
        self
    }

    /// Open `patterns` to `method` only.
    pub fn permit(mut self, method: Method, patterns: &[&str]) -> Self {
        self.rules.extend(patterns.iter().map(|pattern| PublicRule {
            method: Some(method.clone()),
            pattern: PathPattern::parse(pattern),
        }));
        self
    }

    pub fn is_public(&self, method: &Method, path: &str) -> bool {
        self.rules.iter().any(|rule| {
            rule.method.as_ref().map_or(true, |allowed| allowed == method)
                && rule.pattern.matches(path)
        })
    }
}
