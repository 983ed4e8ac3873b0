/// Ticked rows in one of the dashboard tables. `all` mirrors whether every
/// row is ticked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<i64>,
    all: bool,
}

impl Selection {
    pub fn toggle(&mut self, id: i64, checked: bool, total: usize) {
        if checked {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        } else {
            self.ids.retain(|&x| x != id);
        }
        self.all = total > 0 && self.ids.len() == total;
    }

    pub fn toggle_all(&mut self, checked: bool, ids: impl IntoIterator<Item = i64>) {
        self.all = checked;
        self.ids = if checked {
            ids.into_iter().collect()
        } else {
            vec![]
        };
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.all = false;
    }

    /// Forget ids that are no longer in the table.
    pub fn retain(&mut self, keep: impl Fn(i64) -> bool) {
        self.ids.retain(|&id| keep(id));
        if self.ids.is_empty() {
            self.all = false;
        }
    }

    #[must_use]
    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    #[must_use]
    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        self.all
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_all_follows_individual_ticks() {
        let mut selection = Selection::default();
        selection.toggle(1, true, 2);
        assert!(!selection.is_all());
        selection.toggle(2, true, 2);
        assert!(selection.is_all());
        selection.toggle(2, true, 2);
        assert_eq!(selection.ids(), &[1, 2]);

        selection.toggle(1, false, 2);
        assert!(!selection.is_all());
        assert_eq!(selection.ids(), &[2]);
    }

    #[test]
    fn toggle_all() {
        let mut selection = Selection::default();
        selection.toggle_all(true, [4, 5, 6]);
        assert!(selection.is_all());
        assert!(selection.contains(5));

        selection.toggle_all(false, [4, 5, 6]);
        assert!(selection.is_empty());
        assert!(!selection.is_all());
    }
}
