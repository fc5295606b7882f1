use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl Sex {
    pub const ALL: [Sex; 3] = [Sex::Male, Sex::Female, Sex::Unknown];

    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "M" | "m" | "male" | "Male" => Self::Male,
            "F" | "f" | "female" | "Female" => Self::Female,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Unknown => "unknown",
        }
    }
}

// Lenient: a missing, null or unrecognised value reads as `Unknown`.
impl<'de> Deserialize<'de> for Sex {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Sex::parse).unwrap_or_default())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sex: Sex,
    #[serde(default)]
    pub notes: String,
}

impl Person {
    pub fn new(id: impl Into<String>, name: impl Into<String>, sex: Sex) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sex,
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Union {
    pub id: String,
    #[serde(default)]
    pub partner_a: String,
    #[serde(default)]
    pub partner_b: String,
    #[serde(default)]
    pub notes: String,
}

impl Union {
    pub fn new(
        id: impl Into<String>,
        partner_a: impl Into<String>,
        partner_b: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            partner_a: partner_a.into(),
            partner_b: partner_b.into(),
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn has_partner(&self, person_id: &str) -> bool {
        self.partner_a == person_id || self.partner_b == person_id
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildLink {
    pub union_id: String,
    pub child_id: String,
}

impl ChildLink {
    pub fn new(union_id: impl Into<String>, child_id: impl Into<String>) -> Self {
        Self {
            union_id: union_id.into(),
            child_id: child_id.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub people: Vec<Person>,
    pub unions: Vec<Union>,
    pub child_links: Vec<ChildLink>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.unions.is_empty() && self.child_links.is_empty()
    }

    pub fn person(&self, id: &str) -> Option<&Person> {
        self.people.iter().find(|person| person.id == id)
    }

    pub fn union(&self, id: &str) -> Option<&Union> {
        self.unions.iter().find(|union| union.id == id)
    }

    /// Person and union ids share one namespace.
    pub fn contains_id(&self, id: &str) -> bool {
        self.person(id).is_some() || self.union(id).is_some()
    }

    pub fn unions_of<'a>(&'a self, person_id: &'a str) -> impl Iterator<Item = &'a Union> + 'a {
        self.unions
            .iter()
            .filter(move |union| union.has_partner(person_id))
    }

    pub fn children_of<'a>(&'a self, union_id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.child_links
            .iter()
            .filter(move |link| link.union_id == union_id)
            .map(|link| link.child_id.as_str())
    }

    pub fn parent_unions_of<'a>(
        &'a self,
        person_id: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.child_links
            .iter()
            .filter(move |link| link.child_id == person_id)
            .map(|link| link.union_id.as_str())
    }

    pub fn person_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.person(id).map(Person::display_name).unwrap_or(id)
    }
}
