use std::borrow::Cow;
use std::sync::LazyLock;

use heck::ToPascalCase;
use regex::Regex;

use crate::parse::operation::{HttpMethod, Operation};

/// springfox-style generated suffixes: `findPetsUsingGET`, `findPetsUsingGET_1`.
static USING_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)Using[A-Z]+(.*?)$").expect("static regex is valid"));

/// The function name generated for an operation.
///
/// Uses the `operationId` with any `Using<METHOD>` suffix removed, falling back
/// to a route-derived name when the operation has no id.
pub fn operation_name(operation: &Operation, method: HttpMethod, path: &str) -> String {
    name_from_id(operation.operation_id.as_deref(), method, path)
}

/// [`operation_name`] for an entry known only by its raw `operationId`.
pub fn name_from_id(operation_id: Option<&str>, method: HttpMethod, path: &str) -> String {
    match operation_id.map(str::trim) {
        Some(id) if !id.is_empty() => decapitalize(&strip_using_suffix(id)),
        _ => route_to_name(method, path),
    }
}

/// `getPetUsingGET_1` → `getPet_1`.
pub fn strip_using_suffix(operation_id: &str) -> String {
    match USING_SUFFIX.captures(operation_id) {
        Some(caps) => format!("{}{}", &caps[1], &caps[2]),
        None => operation_id.to_string(),
    }
}

/// Uppercase the first character, leave the rest untouched.
pub fn capitalize(word: &str) -> String {
    let word = word.trim();
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase the first character, leave the rest untouched.
pub fn decapitalize(word: &str) -> String {
    let word = word.trim();
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Name an operation after its route: a verb for the method, then the
/// literal path segments in PascalCase.
///
/// `GET /users` is `listUsers`, `GET /users/{id}` is `getUser` and
/// `POST /users/{id}/messages` is `createUsersMessages`.
pub fn route_to_name(method: HttpMethod, path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let targets_item = segments.last().is_some_and(|s| is_template(s));
    let resources: Vec<&str> = segments.into_iter().filter(|s| !is_template(s)).collect();

    let mut name = route_verb(method, targets_item).to_string();
    for (idx, resource) in resources.iter().enumerate() {
        if targets_item && idx + 1 == resources.len() {
            name.push_str(&singularize(resource).to_pascal_case());
        } else {
            name.push_str(&resource.to_pascal_case());
        }
    }
    name
}

fn is_template(segment: &str) -> bool {
    segment.starts_with('{') && segment.ends_with('}')
}

fn route_verb(method: HttpMethod, targets_item: bool) -> &'static str {
    match method {
        HttpMethod::Get if targets_item => "get",
        HttpMethod::Get => "list",
        HttpMethod::Post => "create",
        HttpMethod::Put => "update",
        HttpMethod::Delete => "delete",
        HttpMethod::Head => "head",
        HttpMethod::Options => "options",
    }
}

/// English plural to singular for the common suffixes only.
fn singularize(word: &str) -> Cow<'_, str> {
    if let Some(stem) = word.strip_suffix("ies").filter(|stem| !stem.is_empty()) {
        return Cow::Owned(format!("{stem}y"));
    }
    if ["ses", "xes", "zes"].iter().any(|suffix| word.ends_with(suffix)) {
        return Cow::Borrowed(&word[..word.len() - 2]);
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() && !stem.ends_with('s') => Cow::Borrowed(stem),
        _ => Cow::Borrowed(word),
    }
}
