use std::collections::HashMap;

use crate::mc::{Catalog, McEntry};

/// Share of one Y value among the entries of an X value.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionCell {
    pub value: String,
    /// Character-weighted share in `0.0..=1.0`.
    pub frequency: f64,
    /// Catalog indices of the entries in this cell, in catalog order.
    pub mc_indices: Vec<usize>,
}

#[derive(Default)]
struct Group {
    total: u64,
    cells: Vec<(String, u64, Vec<usize>)>,
    positions: HashMap<String, usize>,
}

/// Relates two features of catalog entries, e.g. MC initial against the
/// initial of a modern reflex.
pub struct Relator<X, Y> {
    x: X,
    y: Y,
}

impl<X, Y> Relator<X, Y>
where
    X: Fn(&McEntry) -> String,
    Y: Fn(&McEntry) -> String,
{
    pub fn new(x: X, y: Y) -> Self {
        Relator { x, y }
    }

    /// For every X value (in order of first appearance), the Y values it
    /// co-occurs with, weighted by `char_count` and sorted by descending
    /// frequency. Ties keep first appearance.
    pub fn distribution(&self, catalog: &Catalog) -> Vec<(String, Vec<DistributionCell>)> {
        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Group> = HashMap::new();

        for (index, entry) in catalog.iter() {
            let x = (self.x)(entry);
            let y = (self.y)(entry);
            let weight = u64::from(entry.char_count);

            if !groups.contains_key(&x) {
                order.push(x.clone());
            }
            let group = groups.entry(x).or_default();
            group.total += weight;
            let position = match group.positions.get(&y) {
                Some(&position) => position,
                None => {
                    group.cells.push((y.clone(), 0, Vec::new()));
                    group.positions.insert(y, group.cells.len() - 1);
                    group.cells.len() - 1
                }
            };
            let cell = &mut group.cells[position];
            cell.1 += weight;
            cell.2.push(index);
        }

        order
            .into_iter()
            .filter_map(|x| {
                let group = groups.remove(&x)?;
                let total = group.total;
                let mut cells: Vec<DistributionCell> = group
                    .cells
                    .into_iter()
                    .map(|(value, weight, mc_indices)| DistributionCell {
                        value,
                        frequency: if total == 0 { 0.0 } else { weight as f64 / total as f64 },
                        mc_indices,
                    })
                    .collect();
                cells.sort_by(|a, b| b.frequency.total_cmp(&a.frequency));
                Some((x, cells))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::Dialect;
    use crate::mc::RawMcEntry;

    fn catalog() -> Catalog {
        let raw: BTreeMap<String, RawMcEntry> = serde_json::from_str(
            r#"{
            "1": {"字數": 1, "MC": {"字": "灘", "聲母": "透"}, "reflex": {"FG": "tan1"}},
            "2": {"字數": 6, "MC": {"字": "他", "聲母": "透"}, "reflex": {"FG": "ha1"}},
            "3": {"字數": 2, "MC": {"字": "通", "聲母": "透"}, "reflex": {"FG": "hung1"}},
            "4": {"字數": 4, "MC": {"字": "東", "聲母": "端"}, "reflex": {"FG": "tung1"}},
            "5": {"字數": 0, "MC": {"字": "?", "聲母": "泥"}, "reflex": {}}
        }"#,
        )
        .unwrap();
        Catalog::from_raw(raw)
    }

    fn onset(entry: &McEntry) -> String {
        entry.reflex(Dialect::Fg).and_then(|r| r.chars().next()).map(String::from).unwrap_or_default()
    }

    #[test]
    fn cells_are_weighted_and_sorted() {
        let relator = Relator::new(|entry: &McEntry| entry.info.initial.clone(), onset);
        let distribution = relator.distribution(&catalog());

        let keys: Vec<&str> = distribution.iter().map(|(x, _)| x.as_str()).collect();
        assert_eq!(keys, ["透", "端", "泥"]);

        let tou = &distribution[0].1;
        assert_eq!(tou.len(), 2);
        assert_eq!(tou[0].value, "h");
        assert_eq!(tou[0].mc_indices, vec![2, 3]);
        assert!((tou[0].frequency - 8.0 / 9.0).abs() < 1e-9);
        assert_eq!(tou[1].value, "t");
        assert_eq!(tou[1].mc_indices, vec![1]);

        let duan = &distribution[1].1;
        assert_eq!(duan[0].frequency, 1.0);

        // A group without characters has no meaningful share.
        let ni = &distribution[2].1;
        assert_eq!(ni[0].value, "");
        assert_eq!(ni[0].frequency, 0.0);
    }
}
