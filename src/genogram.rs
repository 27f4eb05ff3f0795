use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::geometry::Point;
use crate::history::History;

/// Half the side of the square (male) figure, also the circle (female)
/// radius. Figures are drawn centered on `Person::pos`.
pub const PERSON_HALF_SIZE: f32 = 20.0;
/// Press within this distance of a person's center counts as a hit.
pub const PERSON_HIT_RADIUS: f32 = 25.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: u64,
    pub gender: Gender,
    pub pos: Point,
    pub name: String,
    pub age: String,
    pub notes: String,
    pub deceased: bool,
    pub caregiver: bool,
    pub key_person: bool,
}

impl Person {
    pub fn label(&self) -> String {
        let name = if self.name.is_empty() {
            format!("Person {}", self.id)
        } else {
            self.name.clone()
        };
        if self.age.is_empty() {
            name
        } else {
            format!("{} ({})", name, self.age)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarriageStatus {
    Married,
    Divorced,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marriage {
    pub id: u64,
    pub spouse_a: u64,
    pub spouse_b: u64,
    pub status: MarriageStatus,
}

impl Marriage {
    pub fn involves(&self, person: u64) -> bool {
        self.spouse_a == person || self.spouse_b == person
    }
}

/// One record per child. Siblings are recovered by grouping links that
/// share the same parent pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChildLink {
    pub id: u64,
    pub parents: [u64; 2],
    pub child: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Household {
    pub id: u64,
    pub members: Vec<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenogramScene {
    pub people: Vec<Person>,
    pub marriages: Vec<Marriage>,
    pub child_links: Vec<ChildLink>,
    pub households: Vec<Household>,
}

impl GenogramScene {
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
            && self.marriages.is_empty()
            && self.child_links.is_empty()
            && self.households.is_empty()
    }

    pub fn person(&self, id: u64) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    pub fn person_mut(&mut self, id: u64) -> Option<&mut Person> {
        self.people.iter_mut().find(|p| p.id == id)
    }
}

#[derive(Clone)]
pub struct Snapshot {
    scene: GenogramScene,
    next_id: u64,
}

/// Move of a single person. `grab` is the press offset from the figure
/// center and is kept constant for the whole drag.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Drag {
    pub id: u64,
    pub grab: Point,
    recorded: bool,
}

pub struct GenogramEditor {
    pub scene: GenogramScene,
    /// Selection in click order. Relationship commands read positional
    /// roles out of this: for parent-child links the first two selected
    /// are the parents and the rest are children.
    pub selected: Vec<u64>,
    pub history: History<Snapshot>,
    pub next_id: u64,
    pub drag: Option<Drag>,
}

impl Default for GenogramEditor {
    fn default() -> Self {
        Self {
            scene: GenogramScene::default(),
            selected: Vec::new(),
            history: History::default(),
            next_id: 1,
            drag: None,
        }
    }
}

impl GenogramEditor {
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            scene: self.scene.clone(),
            next_id: self.next_id,
        }
    }

    pub fn push_undo(&mut self) {
        let snapshot = self.snapshot();
        self.history.push(snapshot);
    }

    pub fn undo(&mut self) {
        let Some(prev) = self.history.undo() else {
            return;
        };
        self.scene = prev.scene;
        self.next_id = prev.next_id;
        self.selected.clear();
        self.drag = None;
    }

    /// Staggered positions near the canvas center for newly added people.
    pub fn spawn_pos(&self) -> Point {
        let i = self.scene.people.len();
        Point::new(
            300.0 + 40.0 * ((i % 5) as f32),
            200.0 + 40.0 * ((i / 5 % 5) as f32),
        )
    }

    pub fn add_person(&mut self, gender: Gender, pos: Point) -> u64 {
        self.push_undo();
        let id = self.allocate_id();
        self.scene.people.push(Person {
            id,
            gender,
            pos,
            name: String::new(),
            age: String::new(),
            notes: String::new(),
            deceased: false,
            caregiver: false,
            key_person: false,
        });
        self.selected.clear();
        self.selected.push(id);
        id
    }

    /// Requires exactly two selected people, otherwise does nothing.
    pub fn add_marriage(&mut self) {
        if self.selected.len() != 2 {
            return;
        }
        let (a, b) = (self.selected[0], self.selected[1]);
        if self.scene.person(a).is_none() || self.scene.person(b).is_none() {
            return;
        }
        self.push_undo();
        let id = self.allocate_id();
        self.scene.marriages.push(Marriage {
            id,
            spouse_a: a,
            spouse_b: b,
            status: MarriageStatus::Married,
        });
        self.selected.clear();
    }

    /// Requires at least three selected people. The first two are the
    /// parents; every further selection becomes a child of that pair, one
    /// link per child.
    pub fn add_child_links(&mut self) {
        if self.selected.len() < 3 {
            return;
        }
        let parents = [self.selected[0], self.selected[1]];
        if parents.iter().any(|p| self.scene.person(*p).is_none()) {
            return;
        }
        let children: Vec<u64> = self.selected[2..]
            .iter()
            .copied()
            .filter(|c| self.scene.person(*c).is_some())
            .collect();
        if children.is_empty() {
            return;
        }
        self.push_undo();
        for child in children {
            let id = self.allocate_id();
            self.scene.child_links.push(ChildLink { id, parents, child });
        }
        self.selected.clear();
    }

    /// Requires at least two selected people.
    pub fn add_household(&mut self) {
        if self.selected.len() < 2 {
            return;
        }
        if self.selected.iter().any(|m| self.scene.person(*m).is_none()) {
            return;
        }
        self.push_undo();
        let id = self.allocate_id();
        self.scene.households.push(Household {
            id,
            members: self.selected.clone(),
        });
        self.selected.clear();
    }

    pub fn toggle_deceased(&mut self, id: u64) {
        if self.scene.person(id).is_none() {
            return;
        }
        self.push_undo();
        if let Some(person) = self.scene.person_mut(id) {
            person.deceased = !person.deceased;
        }
    }

    pub fn toggle_caregiver(&mut self, id: u64) {
        if self.scene.person(id).is_none() {
            return;
        }
        self.push_undo();
        if let Some(person) = self.scene.person_mut(id) {
            person.caregiver = !person.caregiver;
        }
    }

    pub fn toggle_key_person(&mut self, id: u64) {
        if self.scene.person(id).is_none() {
            return;
        }
        self.push_undo();
        if let Some(person) = self.scene.person_mut(id) {
            person.key_person = !person.key_person;
        }
    }

    pub fn toggle_marriage_status(&mut self, marriage_id: u64) {
        if !self.scene.marriages.iter().any(|m| m.id == marriage_id) {
            return;
        }
        self.push_undo();
        if let Some(marriage) = self.scene.marriages.iter_mut().find(|m| m.id == marriage_id) {
            marriage.status = match marriage.status {
                MarriageStatus::Married => MarriageStatus::Divorced,
                MarriageStatus::Divorced => MarriageStatus::Married,
            };
        }
    }

    /// Deletes the selected people together with every relationship that
    /// references them. Households lose the removed members and are
    /// dropped entirely once fewer than two remain.
    pub fn delete_selected(&mut self) {
        if self.selected.is_empty() {
            return;
        }
        self.push_undo();
        let removed: HashSet<u64> = self.selected.iter().copied().collect();
        self.scene.people.retain(|p| !removed.contains(&p.id));
        self.scene
            .marriages
            .retain(|m| !removed.contains(&m.spouse_a) && !removed.contains(&m.spouse_b));
        self.scene.child_links.retain(|c| {
            !removed.contains(&c.child) && !c.parents.iter().any(|p| removed.contains(p))
        });
        for household in &mut self.scene.households {
            household.members.retain(|m| !removed.contains(m));
        }
        self.scene.households.retain(|h| h.members.len() >= 2);
        self.selected.clear();
        self.drag = None;
    }

    pub fn clear_all(&mut self) {
        if self.scene.is_empty() {
            return;
        }
        self.push_undo();
        self.scene = GenogramScene::default();
        self.selected.clear();
        self.drag = None;
    }

    /// Topmost person under the pointer, last inserted wins.
    pub fn hit_test(&self, pos: Point) -> Option<u64> {
        self.scene
            .people
            .iter()
            .rev()
            .find(|p| p.pos.distance_to(pos) <= PERSON_HIT_RADIUS)
            .map(|p| p.id)
    }

    pub fn pointer_pressed(&mut self, pos: Point, multi: bool) {
        let Some(id) = self.hit_test(pos) else {
            self.selected.clear();
            return;
        };
        if multi {
            if let Some(i) = self.selected.iter().position(|&s| s == id) {
                self.selected.remove(i);
            } else {
                self.selected.push(id);
            }
            return;
        }
        self.selected.clear();
        self.selected.push(id);
        if let Some(person) = self.scene.person(id) {
            let grab = Point::new(pos.x - person.pos.x, pos.y - person.pos.y);
            self.drag = Some(Drag {
                id,
                grab,
                recorded: false,
            });
        }
    }

    pub fn pointer_moved(&mut self, pos: Point) {
        let Some(drag) = self.drag else {
            return;
        };
        if self.scene.person(drag.id).is_none() {
            self.drag = None;
            return;
        }
        if !drag.recorded {
            self.push_undo();
            self.drag = Some(Drag {
                recorded: true,
                ..drag
            });
        }
        if let Some(person) = self.scene.person_mut(drag.id) {
            person.pos = Point::new(pos.x - drag.grab.x, pos.y - drag.grab.y);
        }
    }

    pub fn pointer_released(&mut self) {
        self.drag = None;
    }

    pub fn cancel(&mut self) {
        self.drag = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_at(editor: &mut GenogramEditor, x: f32, y: f32) -> u64 {
        editor.add_person(Gender::Female, Point::new(x, y))
    }

    #[test]
    fn add_person_selects_it() {
        let mut editor = GenogramEditor::default();
        let id = add_at(&mut editor, 100.0, 100.0);
        assert_eq!(editor.selected, vec![id]);
        assert_eq!(editor.scene.people.len(), 1);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut editor = GenogramEditor::default();
        let a = add_at(&mut editor, 0.0, 0.0);
        editor.delete_selected();
        let b = add_at(&mut editor, 0.0, 0.0);
        assert!(b > a);
    }

    #[test]
    fn marriage_requires_exactly_two_selected() {
        let mut editor = GenogramEditor::default();
        add_at(&mut editor, 0.0, 0.0);
        editor.add_marriage();
        assert!(editor.scene.marriages.is_empty());

        let before = editor.history.len();
        editor.add_marriage();
        assert_eq!(editor.history.len(), before);
    }

    #[test]
    fn marriage_links_selection_in_order() {
        let mut editor = GenogramEditor::default();
        let a = add_at(&mut editor, 0.0, 0.0);
        let b = add_at(&mut editor, 200.0, 0.0);
        editor.selected = vec![a, b];
        editor.add_marriage();
        assert_eq!(editor.scene.marriages.len(), 1);
        let marriage = &editor.scene.marriages[0];
        assert_eq!((marriage.spouse_a, marriage.spouse_b), (a, b));
        assert_eq!(marriage.status, MarriageStatus::Married);
        assert!(editor.selected.is_empty());
    }

    #[test]
    fn child_links_emit_one_record_per_child() {
        let mut editor = GenogramEditor::default();
        let father = add_at(&mut editor, 0.0, 0.0);
        let mother = add_at(&mut editor, 200.0, 0.0);
        let child_a = add_at(&mut editor, 50.0, 200.0);
        let child_b = add_at(&mut editor, 150.0, 200.0);
        editor.selected = vec![father, mother, child_a, child_b];
        editor.add_child_links();
        assert_eq!(editor.scene.child_links.len(), 2);
        for link in &editor.scene.child_links {
            assert_eq!(link.parents, [father, mother]);
        }
        let children: Vec<u64> = editor.scene.child_links.iter().map(|l| l.child).collect();
        assert_eq!(children, vec![child_a, child_b]);
    }

    #[test]
    fn deleting_spouse_removes_marriage_but_not_partner() {
        let mut editor = GenogramEditor::default();
        let a = add_at(&mut editor, 0.0, 0.0);
        let b = add_at(&mut editor, 200.0, 0.0);
        editor.selected = vec![a, b];
        editor.add_marriage();

        editor.selected = vec![a];
        editor.delete_selected();

        assert!(editor.scene.marriages.is_empty());
        assert!(editor.scene.person(a).is_none());
        assert!(editor.scene.person(b).is_some());
    }

    #[test]
    fn deleting_parent_removes_child_links() {
        let mut editor = GenogramEditor::default();
        let father = add_at(&mut editor, 0.0, 0.0);
        let mother = add_at(&mut editor, 200.0, 0.0);
        let child = add_at(&mut editor, 100.0, 200.0);
        editor.selected = vec![father, mother, child];
        editor.add_child_links();

        editor.selected = vec![mother];
        editor.delete_selected();

        assert!(editor.scene.child_links.is_empty());
        assert!(editor.scene.person(child).is_some());
    }

    #[test]
    fn household_shrinks_then_drops_below_two_members() {
        let mut editor = GenogramEditor::default();
        let a = add_at(&mut editor, 0.0, 0.0);
        let b = add_at(&mut editor, 100.0, 0.0);
        let c = add_at(&mut editor, 200.0, 0.0);
        editor.selected = vec![a, b, c];
        editor.add_household();
        assert_eq!(editor.scene.households.len(), 1);

        editor.selected = vec![a];
        editor.delete_selected();
        assert_eq!(editor.scene.households[0].members, vec![b, c]);

        editor.selected = vec![b];
        editor.delete_selected();
        assert!(editor.scene.households.is_empty());
    }

    #[test]
    fn undo_restores_previous_scene_and_clears_selection() {
        let mut editor = GenogramEditor::default();
        add_at(&mut editor, 0.0, 0.0);
        let before = editor.scene.clone();
        add_at(&mut editor, 100.0, 0.0);
        assert_ne!(editor.scene, before);

        editor.undo();
        assert_eq!(editor.scene, before);
        assert!(editor.selected.is_empty());
    }

    #[test]
    fn undo_on_empty_history_does_nothing() {
        let mut editor = GenogramEditor::default();
        editor.undo();
        assert!(editor.scene.is_empty());
    }

    #[test]
    fn history_is_bounded() {
        let mut editor = GenogramEditor::default();
        for _ in 0..(crate::history::HISTORY_LIMIT + 10) {
            add_at(&mut editor, 0.0, 0.0);
        }
        assert_eq!(editor.history.len(), crate::history::HISTORY_LIMIT);
    }

    #[test]
    fn drag_snapshots_once_on_first_move() {
        let mut editor = GenogramEditor::default();
        let id = add_at(&mut editor, 100.0, 100.0);
        let depth = editor.history.len();

        editor.pointer_pressed(Point::new(105.0, 103.0), false);
        assert_eq!(editor.history.len(), depth);

        editor.pointer_moved(Point::new(150.0, 150.0));
        editor.pointer_moved(Point::new(180.0, 180.0));
        editor.pointer_released();
        assert_eq!(editor.history.len(), depth + 1);

        let person = editor.scene.person(id).unwrap();
        assert_eq!(person.pos, Point::new(175.0, 177.0));

        editor.undo();
        assert_eq!(
            editor.scene.person(id).unwrap().pos,
            Point::new(100.0, 100.0)
        );
    }

    #[test]
    fn click_without_move_consumes_no_history() {
        let mut editor = GenogramEditor::default();
        add_at(&mut editor, 100.0, 100.0);
        let depth = editor.history.len();
        editor.pointer_pressed(Point::new(100.0, 100.0), false);
        editor.pointer_released();
        assert_eq!(editor.history.len(), depth);
    }

    #[test]
    fn press_on_empty_space_clears_selection() {
        let mut editor = GenogramEditor::default();
        add_at(&mut editor, 100.0, 100.0);
        assert!(!editor.selected.is_empty());
        editor.pointer_pressed(Point::new(400.0, 400.0), false);
        assert!(editor.selected.is_empty());
        assert!(editor.drag.is_none());
    }

    #[test]
    fn modifier_press_toggles_membership() {
        let mut editor = GenogramEditor::default();
        let a = add_at(&mut editor, 100.0, 100.0);
        let b = add_at(&mut editor, 300.0, 100.0);
        editor.pointer_pressed(Point::new(100.0, 100.0), false);
        editor.pointer_released();
        editor.pointer_pressed(Point::new(300.0, 100.0), true);
        editor.pointer_released();
        assert_eq!(editor.selected, vec![a, b]);
        editor.pointer_pressed(Point::new(100.0, 100.0), true);
        editor.pointer_released();
        assert_eq!(editor.selected, vec![b]);
    }

    #[test]
    fn toggles_flip_flags_one_undo_step_each() {
        let mut editor = GenogramEditor::default();
        let id = add_at(&mut editor, 0.0, 0.0);
        let depth = editor.history.len();

        editor.toggle_deceased(id);
        editor.toggle_caregiver(id);
        editor.toggle_key_person(id);
        let person = editor.scene.person(id).unwrap();
        assert!(person.deceased && person.caregiver && person.key_person);
        assert_eq!(editor.history.len(), depth + 3);

        editor.undo();
        assert!(!editor.scene.person(id).unwrap().key_person);
        assert!(editor.scene.person(id).unwrap().caregiver);
    }

    #[test]
    fn marriage_status_toggles_between_married_and_divorced() {
        let mut editor = GenogramEditor::default();
        let a = add_at(&mut editor, 0.0, 0.0);
        let b = add_at(&mut editor, 200.0, 0.0);
        editor.selected = vec![a, b];
        editor.add_marriage();
        let marriage_id = editor.scene.marriages[0].id;

        editor.toggle_marriage_status(marriage_id);
        assert_eq!(editor.scene.marriages[0].status, MarriageStatus::Divorced);
        editor.toggle_marriage_status(marriage_id);
        assert_eq!(editor.scene.marriages[0].status, MarriageStatus::Married);

        let depth = editor.history.len();
        editor.toggle_marriage_status(9999);
        assert_eq!(editor.history.len(), depth);
    }

    #[test]
    fn clear_all_on_empty_scene_is_silent() {
        let mut editor = GenogramEditor::default();
        editor.clear_all();
        assert!(editor.history.is_empty());
    }

    #[test]
    fn clear_all_is_one_undo_step() {
        let mut editor = GenogramEditor::default();
        add_at(&mut editor, 0.0, 0.0);
        add_at(&mut editor, 100.0, 0.0);
        let before = editor.scene.clone();
        editor.clear_all();
        assert!(editor.scene.is_empty());
        editor.undo();
        assert_eq!(editor.scene, before);
    }
}
