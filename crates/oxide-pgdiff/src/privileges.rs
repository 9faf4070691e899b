//! Privilege (ACL) diffing.
//!
//! The engine hands every ACL comparison to a [`PrivilegeDiffer`]. Two
//! implementations ship with the crate: [`NoPrivileges`], which never emits
//! anything, and [`AclDiffer`], which understands PostgreSQL `aclitem[]`
//! text such as `{alice=U/postgres,=U*/postgres}`.

use indexmap::IndexMap;

use crate::catalog::ObjectKind;
use crate::error::{DiffError, Result};
use crate::format::SqlFormatter;

/// Everything a privilege differ needs to know about one object.
#[derive(Debug, Clone, Copy)]
pub struct PrivilegeRequest<'a> {
    /// Object kind.
    pub kind: ObjectKind,
    /// Formatted reference to the object under its old identity.
    pub old_ref: &'a str,
    /// Formatted reference to the object under its new identity.
    pub new_ref: &'a str,
    /// Old ACL, `None` meaning the default ACL.
    pub old_acl: Option<&'a str>,
    /// New ACL, `None` meaning the default ACL.
    pub new_acl: Option<&'a str>,
    /// Old owner.
    pub old_owner: &'a str,
    /// New owner.
    pub new_owner: &'a str,
    /// Whether an `OWNER TO` statement precedes the privilege statements.
    /// The old owner's grants then already belong to the new owner.
    pub owner_transferred: bool,
}

/// Produces GRANT / REVOKE statements for an ACL change.
pub trait PrivilegeDiffer: Send + Sync {
    /// Returns the statements (without terminators) turning the old ACL
    /// into the new one.
    fn diff_privileges(
        &self,
        request: &PrivilegeRequest<'_>,
        fmt: &dyn SqlFormatter,
    ) -> Result<Vec<String>>;
}

/// A privilege differ that emits nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrivileges;

impl PrivilegeDiffer for NoPrivileges {
    fn diff_privileges(
        &self,
        _request: &PrivilegeRequest<'_>,
        _fmt: &dyn SqlFormatter,
    ) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Privileges one grantee holds: privilege letter -> grant option.
type Grants = IndexMap<char, bool>;

/// A parsed ACL: grantee (empty for PUBLIC) -> grants.
type Acl = IndexMap<String, Grants>;

/// Diffs PostgreSQL `aclitem[]` text.
#[derive(Debug, Clone, Copy, Default)]
pub struct AclDiffer;

impl AclDiffer {
    /// Creates a new ACL differ.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// The ACL an object has when none is stored: the owner holds every
    /// privilege the kind supports.
    fn default_acl(kind: ObjectKind, owner: &str) -> Acl {
        let grants: Grants = kind_privileges(kind).chars().map(|c| (c, false)).collect();
        let mut acl = Acl::new();
        if !grants.is_empty() {
            acl.insert(owner.to_string(), grants);
        }
        acl
    }

    fn resolve(kind: ObjectKind, raw: Option<&str>, owner: &str) -> Result<Acl> {
        match raw {
            Some(raw) => parse_acl(raw),
            None => Ok(Self::default_acl(kind, owner)),
        }
    }
}

impl PrivilegeDiffer for AclDiffer {
    fn diff_privileges(
        &self,
        request: &PrivilegeRequest<'_>,
        fmt: &dyn SqlFormatter,
    ) -> Result<Vec<String>> {
        let mut old = Self::resolve(request.kind, request.old_acl, request.old_owner)?;
        if request.owner_transferred && request.old_owner != request.new_owner {
            transfer_owner(&mut old, request.old_owner, request.new_owner);
        }
        let new = Self::resolve(request.kind, request.new_acl, request.new_owner)?;
        let target = format!("{} {}", request.kind.grant_keyword(), request.new_ref);

        let empty = Grants::new();
        let mut grantees: Vec<&String> = old.keys().collect();
        grantees.extend(new.keys().filter(|g| !old.contains_key(*g)));

        let mut statements = Vec::new();
        for grantee in grantees {
            let before = old.get(grantee).unwrap_or(&empty);
            let after = new.get(grantee).unwrap_or(&empty);
            let who = if grantee.is_empty() {
                "PUBLIC".to_string()
            } else {
                fmt.quote_ident(grantee)
            };

            let revoked: Vec<char> = before
                .keys()
                .filter(|p| !after.contains_key(*p))
                .copied()
                .collect();
            let revoked_option: Vec<char> = before
                .iter()
                .filter(|(p, go)| **go && after.get(*p) == Some(&false))
                .map(|(p, _)| *p)
                .collect();
            let granted: Vec<char> = after
                .iter()
                .filter(|(p, go)| !**go && !before.contains_key(*p))
                .map(|(p, _)| *p)
                .collect();
            let granted_option: Vec<char> = after
                .iter()
                .filter(|(p, go)| **go && before.get(*p) != Some(&true))
                .map(|(p, _)| *p)
                .collect();

            if !revoked.is_empty() {
                statements.push(format!(
                    "REVOKE {} ON {} FROM {}",
                    privilege_names(&revoked),
                    target,
                    who
                ));
            }
            if !revoked_option.is_empty() {
                statements.push(format!(
                    "REVOKE GRANT OPTION FOR {} ON {} FROM {}",
                    privilege_names(&revoked_option),
                    target,
                    who
                ));
            }
            if !granted.is_empty() {
                statements.push(format!(
                    "GRANT {} ON {} TO {}",
                    privilege_names(&granted),
                    target,
                    who
                ));
            }
            if !granted_option.is_empty() {
                statements.push(format!(
                    "GRANT {} ON {} TO {} WITH GRANT OPTION",
                    privilege_names(&granted_option),
                    target,
                    who
                ));
            }
        }

        Ok(statements)
    }
}

/// Moves the grants held by `from` onto `to`, as `ALTER ... OWNER TO` does.
fn transfer_owner(acl: &mut Acl, from: &str, to: &str) {
    let Some(grants) = acl.shift_remove(from) else {
        return;
    };
    let entry = acl.entry(to.to_string()).or_default();
    for (privilege, grant_option) in grants {
        *entry.entry(privilege).or_insert(false) |= grant_option;
    }
}

/// Privilege letters applicable to a kind.
const fn kind_privileges(kind: ObjectKind) -> &'static str {
    match kind {
        ObjectKind::ForeignServer => "U",
        ObjectKind::Statistics | ObjectKind::Rule | ObjectKind::Trigger => "",
    }
}

fn privilege_name(letter: char) -> Option<&'static str> {
    Some(match letter {
        'r' => "SELECT",
        'w' => "UPDATE",
        'a' => "INSERT",
        'd' => "DELETE",
        'D' => "TRUNCATE",
        'x' => "REFERENCES",
        't' => "TRIGGER",
        'X' => "EXECUTE",
        'U' => "USAGE",
        'C' => "CREATE",
        'c' => "CONNECT",
        'T' => "TEMPORARY",
        's' => "SET",
        'A' => "ALTER SYSTEM",
        'm' => "MAINTAIN",
        _ => return None,
    })
}

fn privilege_names(letters: &[char]) -> String {
    letters
        .iter()
        .filter_map(|c| privilege_name(*c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parses `{item,item,...}` into grantee -> grants, merging items that
/// differ only by grantor.
fn parse_acl(raw: &str) -> Result<Acl> {
    let body = raw.trim();
    let body = body
        .strip_prefix('{')
        .and_then(|b| b.strip_suffix('}'))
        .unwrap_or(body);

    let mut acl = Acl::new();
    for item in split_items(body) {
        let (grantee, grants) = parse_item(item)?;
        let entry = acl.entry(grantee).or_default();
        for (privilege, grant_option) in grants {
            let slot = entry.entry(privilege).or_insert(false);
            *slot |= grant_option;
        }
    }
    Ok(acl)
}

/// Splits on commas that are not inside double quotes.
fn split_items(body: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                items.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if !body[start..].trim().is_empty() {
        items.push(&body[start..]);
    }
    items
}

/// Parses one `grantee=privs/grantor` item.
fn parse_item(item: &str) -> Result<(String, Grants)> {
    let malformed = || DiffError::MalformedAcl {
        entry: item.to_string(),
    };

    let (grantee, rest) = read_role(item.trim()).ok_or_else(malformed)?;
    let rest = rest.strip_prefix('=').ok_or_else(malformed)?;
    let (privs, _grantor) = rest.split_once('/').ok_or_else(malformed)?;

    let mut grants = Grants::new();
    let mut letters = privs.chars().peekable();
    while let Some(letter) = letters.next() {
        if privilege_name(letter).is_none() {
            return Err(malformed());
        }
        let grant_option = letters.next_if_eq(&'*').is_some();
        grants.insert(letter, grant_option);
    }

    Ok((grantee, grants))
}

/// Reads a possibly double-quoted role name, returning it and the rest.
fn read_role(text: &str) -> Option<(String, &str)> {
    let Some(quoted) = text.strip_prefix('"') else {
        let end = text.find('=')?;
        return Some((text[..end].to_string(), &text[end..]));
    };

    let mut role = String::new();
    let mut chars = quoted.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '"' {
            if chars.next_if(|(_, n)| *n == '"').is_some() {
                role.push('"');
            } else {
                return Some((role, &quoted[i + 1..]));
            }
        } else {
            role.push(c);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::PostgresFormatter;

    fn request<'a>(old_acl: Option<&'a str>, new_acl: Option<&'a str>) -> PrivilegeRequest<'a> {
        PrivilegeRequest {
            kind: ObjectKind::ForeignServer,
            old_ref: "srv",
            new_ref: "srv",
            old_acl,
            new_acl,
            old_owner: "postgres",
            new_owner: "postgres",
            owner_transferred: false,
        }
    }

    fn diff(old_acl: Option<&str>, new_acl: Option<&str>) -> Vec<String> {
        AclDiffer::new()
            .diff_privileges(&request(old_acl, new_acl), &PostgresFormatter::new())
            .unwrap()
    }

    #[test]
    fn test_parse_acl_items() {
        let acl = parse_acl("{postgres=U*/postgres,=U/postgres,\"Bob Smith\"=U/postgres}").unwrap();
        assert_eq!(acl.len(), 3);
        assert!(acl["postgres"][&'U']);
        assert!(!acl[""][&'U']);
        assert!(acl.contains_key("Bob Smith"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_acl("{alice}"),
            Err(DiffError::MalformedAcl { .. })
        ));
        assert!(matches!(
            parse_acl("{alice=Q/postgres}"),
            Err(DiffError::MalformedAcl { .. })
        ));
    }

    #[test]
    fn test_grant_to_new_role() {
        let sql = diff(
            Some("{postgres=U/postgres}"),
            Some("{postgres=U/postgres,alice=U/postgres}"),
        );
        assert_eq!(sql, vec!["GRANT USAGE ON FOREIGN SERVER srv TO alice"]);
    }

    #[test]
    fn test_revoke_from_public() {
        let sql = diff(Some("{postgres=U/postgres,=U/postgres}"), Some("{postgres=U/postgres}"));
        assert_eq!(sql, vec!["REVOKE USAGE ON FOREIGN SERVER srv FROM PUBLIC"]);
    }

    #[test]
    fn test_grant_option_changes() {
        let sql = diff(
            Some("{postgres=U/postgres,alice=U*/postgres}"),
            Some("{postgres=U/postgres,alice=U/postgres,bob=U*/postgres}"),
        );
        assert_eq!(
            sql,
            vec![
                "REVOKE GRANT OPTION FOR USAGE ON FOREIGN SERVER srv FROM alice",
                "GRANT USAGE ON FOREIGN SERVER srv TO bob WITH GRANT OPTION",
            ]
        );
    }

    #[test]
    fn test_absent_acl_means_owner_default() {
        assert!(diff(None, Some("{postgres=U/postgres}")).is_empty());
        assert_eq!(
            diff(None, Some("{}")),
            vec!["REVOKE USAGE ON FOREIGN SERVER srv FROM postgres"]
        );
    }

    #[test]
    fn test_owner_transfer_carries_owner_grants() {
        let mut req = request(
            Some("{admin=U*/admin,app=U/admin}"),
            Some("{ops=U*/ops,app=U/ops}"),
        );
        req.old_owner = "admin";
        req.new_owner = "ops";
        let fmt = PostgresFormatter::new();

        req.owner_transferred = true;
        assert!(AclDiffer::new().diff_privileges(&req, &fmt).unwrap().is_empty());

        req.owner_transferred = false;
        assert_eq!(
            AclDiffer::new().diff_privileges(&req, &fmt).unwrap(),
            vec![
                "REVOKE USAGE ON FOREIGN SERVER srv FROM admin",
                "GRANT USAGE ON FOREIGN SERVER srv TO ops WITH GRANT OPTION",
            ]
        );
    }

    #[test]
    fn test_owner_transfer_merges_into_existing_grants() {
        let mut req = request(Some("{admin=U*/admin,ops=U/admin}"), Some("{ops=U*/ops}"));
        req.old_owner = "admin";
        req.new_owner = "ops";
        req.owner_transferred = true;
        let sql = AclDiffer::new()
            .diff_privileges(&req, &PostgresFormatter::new())
            .unwrap();
        assert!(sql.is_empty());
    }

    #[test]
    fn test_no_privileges_is_silent() {
        let out = NoPrivileges
            .diff_privileges(&request(None, Some("{a=U/b}")), &PostgresFormatter::new())
            .unwrap();
        assert!(out.is_empty());
    }
}
