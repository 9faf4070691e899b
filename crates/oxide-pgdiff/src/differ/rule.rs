//! Rewrite rules.
//!
//! Only renames and comments are diffed; a changed rule body is left to a
//! higher layer to express as drop + create.

use crate::catalog::{CatalogItem, Rule};
use crate::error::Result;
use crate::format::SqlFormatter;

use super::{DiffContext, ObjectDiffer};

impl ObjectDiffer for Rule {
    fn object_ref(&self, fmt: &dyn SqlFormatter) -> String {
        fmt.on_table(&self.key())
    }

    fn create_statements(&self, _ctx: &DiffContext<'_>) -> Result<Vec<String>> {
        Ok(vec![self.definition.clone()])
    }

    fn rename_statement(old: &Self, new: &Self, fmt: &dyn SqlFormatter) -> Option<String> {
        (old.name != new.name).then(|| {
            format!(
                "ALTER RULE {} RENAME TO {}",
                old.object_ref(fmt),
                fmt.quote_ident(&new.name)
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiffConfig;
    use crate::differ::{create_object, diff_pair};
    use crate::identity::ObjectIdentity;

    fn rule(name: &str, comment: Option<&str>) -> Rule {
        Rule {
            oid: 1,
            table: ObjectIdentity::new("public", "orders"),
            name: name.to_string(),
            definition: format!(
                "CREATE RULE {name} AS ON DELETE TO public.orders DO INSTEAD NOTHING;"
            ),
            comment: comment.map(str::to_string),
        }
    }

    #[test]
    fn test_drop() {
        let fmt = crate::format::PostgresFormatter::new();
        assert_eq!(
            rule("r1", None).drop_statement(&fmt),
            "DROP RULE r1 ON public.orders"
        );
    }

    #[test]
    fn test_create_reuses_definition_and_adds_comment() {
        let config = DiffConfig::new();
        let ctx = DiffContext::new(&config);
        let sql = create_object(&rule("r1", Some("keep rows")), &ctx).unwrap();
        assert_eq!(
            sql,
            vec![
                "CREATE RULE r1 AS ON DELETE TO public.orders DO INSTEAD NOTHING;".to_string(),
                "COMMENT ON RULE r1 ON public.orders IS 'keep rows'".to_string(),
            ]
        );
    }

    #[test]
    fn test_create_without_comments_enabled() {
        let config = DiffConfig::new().with_comments(false);
        let ctx = DiffContext::new(&config);
        let sql = create_object(&rule("r1", Some("keep rows")), &ctx).unwrap();
        assert_eq!(sql.len(), 1);
    }

    #[test]
    fn test_rename_only() {
        let config = DiffConfig::new();
        let ctx = DiffContext::new(&config);
        let sql = diff_pair(&rule("r1", Some("c")), &rule("r2", Some("c")), &ctx).unwrap();
        assert_eq!(sql, vec!["ALTER RULE r1 ON public.orders RENAME TO r2"]);
    }

    #[test]
    fn test_rename_then_comment_uses_new_name() {
        let config = DiffConfig::new();
        let ctx = DiffContext::new(&config);
        let sql = diff_pair(&rule("r1", Some("a")), &rule("r2", None), &ctx).unwrap();
        assert_eq!(
            sql,
            vec![
                "ALTER RULE r1 ON public.orders RENAME TO r2",
                "COMMENT ON RULE r2 ON public.orders IS NULL",
            ]
        );
    }

    #[test]
    fn test_body_change_is_not_diffed() {
        let config = DiffConfig::new();
        let ctx = DiffContext::new(&config);
        let mut changed = rule("r1", None);
        changed.definition = "CREATE RULE r1 AS ON UPDATE TO public.orders DO NOTHING".to_string();
        assert!(diff_pair(&rule("r1", None), &changed, &ctx).unwrap().is_empty());
    }
}
