use crate::{H224Client, error::H224HandlerError};
use h224::pdu::H224ClientId;
use std::collections::{BTreeMap, btree_map::Entry};

pub struct RegisteredClient<'a> {
    client: Box<dyn H224Client + 'a>,
    remote_available: bool,
    remote_has_extra_capabilities: bool,
}

impl<'a> RegisteredClient<'a> {
    pub fn client(&self) -> &(dyn H224Client + 'a) {
        self.client.as_ref()
    }

    pub fn client_mut(&mut self) -> &mut (dyn H224Client + 'a) {
        self.client.as_mut()
    }

    /// Whether the remote side listed a matching client in its last client list.
    pub fn remote_available(&self) -> bool {
        self.remote_available
    }

    pub fn remote_has_extra_capabilities(&self) -> bool {
        self.remote_has_extra_capabilities
    }
}

/// Local H.224 clients, keyed and ordered by their full identification.
///
/// At most one client per identification; the CME identification is reserved
/// and standard IDs must stay below the extended client ID marker.
pub struct H224ClientRegistry<'a> {
    clients: BTreeMap<H224ClientId, RegisteredClient<'a>>,
}

impl<'a> Default for H224ClientRegistry<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> H224ClientRegistry<'a> {
    pub fn new() -> Self {
        Self {
            clients: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, client: Box<dyn H224Client + 'a>) -> Result<(), H224HandlerError> {
        let client_id = client.client_id();
        if client_id.is_cme() {
            return Err(H224HandlerError::ReservedClientId);
        }

        if !client_id.is_valid() {
            return Err(H224HandlerError::InvalidClientId(client_id));
        }

        match self.clients.entry(client_id) {
            Entry::Occupied(_) => Err(H224HandlerError::ClientAlreadyRegistered(client_id)),
            Entry::Vacant(entry) => {
                entry.insert(RegisteredClient {
                    client,
                    remote_available: false,
                    remote_has_extra_capabilities: false,
                });
                Ok(())
            }
        }
    }

    pub fn unregister(&mut self, client_id: &H224ClientId) -> Option<Box<dyn H224Client + 'a>> {
        self.clients
            .remove(client_id)
            .map(|registered| registered.client)
    }

    pub fn contains(&self, client_id: &H224ClientId) -> bool {
        self.clients.contains_key(client_id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn get(&self, client_id: &H224ClientId) -> Option<&RegisteredClient<'a>> {
        self.clients.get(client_id)
    }

    pub fn get_mut(&mut self, client_id: &H224ClientId) -> Option<&mut RegisteredClient<'a>> {
        self.clients.get_mut(client_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&H224ClientId, &RegisteredClient<'a>)> {
        self.clients.iter()
    }

    /// Records what the remote side reported for `client_id` and notifies
    /// the client. Returns `false` if no such client is registered.
    pub fn set_remote_client_available(
        &mut self,
        client_id: &H224ClientId,
        available: bool,
        has_extra_capabilities: bool,
    ) -> bool {
        match self.clients.get_mut(client_id) {
            Some(registered) => {
                registered.remote_available = available;
                registered.remote_has_extra_capabilities = has_extra_capabilities;
                registered
                    .client
                    .on_remote_client_availability(available, has_extra_capabilities);
                true
            }
            None => false,
        }
    }

    /// Marks every remote counterpart as unavailable.
    pub fn reset_remote_availability(&mut self) {
        for registered in self.clients.values_mut() {
            registered.remote_available = false;
            registered.remote_has_extra_capabilities = false;
            registered.client.on_remote_client_availability(false, false);
        }
    }
}
