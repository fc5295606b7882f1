use log::debug;
use thiserror::Error;

use super::model::{ChildLink, Dataset, Person, Union};

/// Rejections from the editor operations. The dataset is never modified when one of these
/// is returned.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("id must not be empty")]
    EmptyId,
    #[error("id `{0}` is already used by another person or union")]
    DuplicateId(String),
    #[error("no person with id `{0}`")]
    UnknownPerson(String),
    #[error("no union with id `{0}`")]
    UnknownUnion(String),
    #[error("`{child_id}` is already linked as a child of `{union_id}`")]
    DuplicateChildLink { union_id: String, child_id: String },
    #[error("no child link from `{union_id}` to `{child_id}`")]
    UnknownChildLink { union_id: String, child_id: String },
    #[error(
        "person `{id}` is still referenced by {unions} union(s) and {child_links} child link(s); detach it first"
    )]
    PersonInUse {
        id: String,
        unions: usize,
        child_links: usize,
    },
}

fn normalized_id(raw: &str) -> Result<String, EditError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(EditError::EmptyId);
    }
    Ok(id.to_owned())
}

impl Dataset {
    pub fn add_person(&mut self, mut person: Person) -> Result<(), EditError> {
        person.id = normalized_id(&person.id)?;
        if self.contains_id(&person.id) {
            return Err(EditError::DuplicateId(person.id));
        }

        debug!("adding person `{}`", person.id);
        self.people.push(person);
        Ok(())
    }

    pub fn add_union(&mut self, mut union: Union) -> Result<(), EditError> {
        union.id = normalized_id(&union.id)?;
        if self.contains_id(&union.id) {
            return Err(EditError::DuplicateId(union.id));
        }
        for partner in [&union.partner_a, &union.partner_b] {
            if self.person(partner).is_none() {
                return Err(EditError::UnknownPerson(partner.clone()));
            }
        }

        debug!(
            "adding union `{}` ({} + {})",
            union.id, union.partner_a, union.partner_b
        );
        self.unions.push(union);
        Ok(())
    }

    pub fn add_child_link(&mut self, link: ChildLink) -> Result<(), EditError> {
        if self.union(&link.union_id).is_none() {
            return Err(EditError::UnknownUnion(link.union_id));
        }
        if self.person(&link.child_id).is_none() {
            return Err(EditError::UnknownPerson(link.child_id));
        }
        if self.child_links.contains(&link) {
            return Err(EditError::DuplicateChildLink {
                union_id: link.union_id,
                child_id: link.child_id,
            });
        }

        debug!("linking child `{}` to union `{}`", link.child_id, link.union_id);
        self.child_links.push(link);
        Ok(())
    }

    pub fn remove_person(&mut self, id: &str) -> Result<Person, EditError> {
        let Some(index) = self.people.iter().position(|person| person.id == id) else {
            return Err(EditError::UnknownPerson(id.to_owned()));
        };

        let unions = self.unions_of(id).count();
        let child_links = self
            .child_links
            .iter()
            .filter(|link| link.child_id == id)
            .count();
        if unions > 0 || child_links > 0 {
            return Err(EditError::PersonInUse {
                id: id.to_owned(),
                unions,
                child_links,
            });
        }

        debug!("removing person `{id}`");
        Ok(self.people.remove(index))
    }

    pub fn remove_union(&mut self, id: &str) -> Result<(Union, usize), EditError> {
        let Some(index) = self.unions.iter().position(|union| union.id == id) else {
            return Err(EditError::UnknownUnion(id.to_owned()));
        };

        let removed = self.unions.remove(index);
        let before = self.child_links.len();
        self.child_links.retain(|link| link.union_id != id);
        let dropped = before - self.child_links.len();

        debug!("removed union `{id}` and {dropped} child link(s)");
        Ok((removed, dropped))
    }

    pub fn remove_child_link(&mut self, union_id: &str, child_id: &str) -> Result<(), EditError> {
        let Some(index) = self
            .child_links
            .iter()
            .position(|link| link.union_id == union_id && link.child_id == child_id)
        else {
            return Err(EditError::UnknownChildLink {
                union_id: union_id.to_owned(),
                child_id: child_id.to_owned(),
            });
        };

        self.child_links.remove(index);
        Ok(())
    }
}
