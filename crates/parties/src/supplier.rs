use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use retaildesk_core::{
    find_by_id, Aggregate, AggregateId, AggregateRoot, DomainError, DomainResult, Entity,
};
use retaildesk_events::Event;

/// Supplier identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupplierId(pub AggregateId);

impl SupplierId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }

    pub fn generate() -> Self {
        Self(AggregateId::new())
    }
}

impl core::fmt::Display for SupplierId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Identifier of the supplier directory owned by one session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupplierDirectoryId(pub AggregateId);

impl SupplierDirectoryId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    id: SupplierId,
    name: String,
    contact: String,
}

impl Supplier {
    pub fn id_typed(&self) -> SupplierId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact(&self) -> &str {
        &self.contact
    }
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Aggregate root: append-only supplier directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierDirectory {
    id: SupplierDirectoryId,
    suppliers: Vec<Supplier>,
    version: u64,
}

impl SupplierDirectory {
    pub fn empty(id: SupplierDirectoryId) -> Self {
        Self {
            id,
            suppliers: Vec::new(),
            version: 0,
        }
    }

    pub fn suppliers(&self) -> &[Supplier] {
        &self.suppliers
    }

    pub fn len(&self) -> usize {
        self.suppliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suppliers.is_empty()
    }

    pub fn get(&self, supplier_id: SupplierId) -> Option<&Supplier> {
        find_by_id(&self.suppliers, &supplier_id)
    }

    /// Resolve a supplier name to exactly one row (`NotFound` / `Conflict` otherwise).
    pub fn resolve(&self, name: &str) -> DomainResult<SupplierId> {
        let name = name.trim();
        let mut matches = self.suppliers.iter().filter(|s| s.name == name);
        let first = matches
            .next()
            .ok_or_else(|| DomainError::not_found(format!("supplier {name:?}")))?;
        if matches.next().is_some() {
            return Err(DomainError::conflict(format!(
                "ambiguous supplier name {name:?}; address the row by id"
            )));
        }
        Ok(first.id)
    }
}

impl AggregateRoot for SupplierDirectory {
    type Id = SupplierDirectoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddSupplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddSupplier {
    pub supplier_id: SupplierId,
    pub name: String,
    pub contact: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplierCommand {
    AddSupplier(AddSupplier),
}

/// Event: SupplierAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierAdded {
    pub supplier_id: SupplierId,
    pub name: String,
    pub contact: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplierEvent {
    SupplierAdded(SupplierAdded),
}

impl Event for SupplierEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SupplierEvent::SupplierAdded(_) => "parties.supplier.added",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SupplierEvent::SupplierAdded(e) => e.occurred_at,
        }
    }

    fn describe(&self) -> String {
        match self {
            SupplierEvent::SupplierAdded(e) => format!("Supplier added: {}", e.name),
        }
    }
}

impl Aggregate for SupplierDirectory {
    type Command = SupplierCommand;
    type Event = SupplierEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            SupplierEvent::SupplierAdded(e) => self.suppliers.push(Supplier {
                id: e.supplier_id,
                name: e.name.clone(),
                contact: e.contact.clone(),
            }),
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            SupplierCommand::AddSupplier(cmd) => self.handle_add(cmd),
        }
    }
}

impl SupplierDirectory {
    /// Blank name or contact is accepted as a no-op: no event, no error.
    fn handle_add(&self, cmd: &AddSupplier) -> Result<Vec<SupplierEvent>, DomainError> {
        if self.get(cmd.supplier_id).is_some() {
            return Err(DomainError::conflict("supplier id already exists"));
        }

        let name = cmd.name.trim();
        let contact = cmd.contact.trim();
        if name.is_empty() || contact.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![SupplierEvent::SupplierAdded(SupplierAdded {
            supplier_id: cmd.supplier_id,
            name: name.to_string(),
            contact: contact.to_string(),
            occurred_at: cmd.occurred_at,
        })])
    }
}
