//! Dependency-graph validation for the catalog.
//!
//! The load order is declared, not computed; validation checks it against
//! the declared foreign-key edges and rejects cyclic graphs before any
//! generation or load work starts.

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::Catalog;
use crate::error::CatalogError;

/// Validate the catalog's dependency graph and declared load order.
///
/// Fails with [`CatalogError::DependencyCycle`] if the predecessor edges are
/// cyclic, and with an ordering error if the declared load order does not
/// place every table after all of its predecessors.
pub fn validate_catalog(catalog: &Catalog) -> Result<(), CatalogError> {
    for table in catalog.tables() {
        for predecessor in table.predecessors {
            if catalog.get(predecessor).is_none() {
                return Err(CatalogError::UnknownTable((*predecessor).to_string()));
            }
        }
    }

    toposort(catalog).map_err(CatalogError::DependencyCycle)?;

    let mut positions = BTreeMap::new();
    for (index, name) in catalog.load_order().iter().enumerate() {
        if catalog.get(name).is_none() {
            return Err(CatalogError::UnknownTable((*name).to_string()));
        }
        positions.insert(*name, index);
    }

    for table in catalog.tables() {
        let Some(position) = positions.get(table.name) else {
            return Err(CatalogError::MissingFromOrder(table.name.to_string()));
        };
        for predecessor in table.predecessors {
            match positions.get(predecessor) {
                Some(predecessor_position) if predecessor_position < position => {}
                _ => {
                    return Err(CatalogError::OrderViolation {
                        table: table.name.to_string(),
                        predecessor: (*predecessor).to_string(),
                    });
                }
            }
        }
    }

    Ok(())
}

/// Kahn's algorithm over predecessor edges; returns the unresolved tables on
/// failure. Self-references are not modeled as edges.
fn toposort(catalog: &Catalog) -> Result<Vec<String>, Vec<String>> {
    let mut indegree: BTreeMap<&str, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

    for table in catalog.tables() {
        indegree.entry(table.name).or_insert(0);
        for predecessor in table.predecessors {
            if *predecessor == table.name {
                continue;
            }
            *indegree.entry(table.name).or_insert(0) += 1;
            dependents.entry(predecessor).or_default().insert(table.name);
        }
    }

    let mut ready: BTreeSet<&str> = indegree
        .iter()
        .filter_map(|(name, count)| if *count == 0 { Some(*name) } else { None })
        .collect();

    let mut order = Vec::with_capacity(indegree.len());
    while let Some(name) = ready.iter().next().copied() {
        ready.remove(name);
        order.push(name.to_string());

        if let Some(children) = dependents.get(name) {
            for child in children {
                if let Some(count) = indegree.get_mut(child) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        ready.insert(*child);
                    }
                }
            }
        }
    }

    if order.len() == indegree.len() {
        Ok(order)
    } else {
        let cycle: Vec<String> = indegree
            .into_iter()
            .filter_map(|(name, count)| {
                if count > 0 {
                    Some(name.to_string())
                } else {
                    None
                }
            })
            .collect();
        Err(cycle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{ColumnSpec, TableSpec, ValueSpec};

    const ID_ONLY: &[ColumnSpec] = &[ColumnSpec::new(
        "name",
        ValueSpec::Sequence {
            prefix: "row",
            width: 0,
        },
    )];

    fn table(name: &'static str, predecessors: &'static [&'static str]) -> TableSpec {
        TableSpec {
            name,
            columns: ID_ONLY,
            default_rows: 1,
            default_partition_size: 1,
            predecessors,
        }
    }

    #[test]
    fn builtin_catalog_validates() {
        validate_catalog(&Catalog::builtin()).unwrap();
    }

    #[test]
    fn cycle_is_rejected() {
        let catalog = Catalog::new(
            vec![table("a", &["b"]), table("b", &["a"])],
            vec!["a", "b"],
        );
        match validate_catalog(&catalog) {
            Err(CatalogError::DependencyCycle(nodes)) => {
                assert!(nodes.contains(&"a".to_string()));
                assert!(nodes.contains(&"b".to_string()));
            }
            other => panic!("expected cycle error, got {other:?}"),
        }
    }

    #[test]
    fn order_violation_is_rejected() {
        let catalog = Catalog::new(
            vec![table("parent", &[]), table("child", &["parent"])],
            vec!["child", "parent"],
        );
        match validate_catalog(&catalog) {
            Err(CatalogError::OrderViolation { table, predecessor }) => {
                assert_eq!(table, "child");
                assert_eq!(predecessor, "parent");
            }
            other => panic!("expected order violation, got {other:?}"),
        }
    }

    #[test]
    fn unknown_predecessor_is_rejected() {
        let catalog = Catalog::new(vec![table("child", &["ghost"])], vec!["child"]);
        assert!(matches!(
            validate_catalog(&catalog),
            Err(CatalogError::UnknownTable(name)) if name == "ghost"
        ));
    }

    #[test]
    fn missing_order_entry_is_rejected() {
        let catalog = Catalog::new(
            vec![table("a", &[]), table("b", &[])],
            vec!["a"],
        );
        assert!(matches!(
            validate_catalog(&catalog),
            Err(CatalogError::MissingFromOrder(name)) if name == "b"
        ));
    }
}
