use crate::{
    H224Client, H224ClientRegistry, H224Framing, H224HandlerConfig,
    constants::{
        CME_CLIENT_LIST_CODE, CME_EXTRA_CAPABILITIES_CODE, CME_EXTRA_CAPABILITIES_FLAG,
        CME_RESPONSE_COMMAND, CME_RESPONSE_MESSAGE, H224_TIMESTAMP_UNITS_PER_MILLISECOND,
    },
    error::H224HandlerError,
};
use h224::{
    constants::{H224_BROADCAST, Q922_OCTET_ALIGNED_BIT_POSITION},
    pdu::{H224ClientId, H224Frame},
    utils::now,
};

/// One encoded frame ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct H224Packet {
    pub payload: Vec<u8>,

    /// Elapsed time since transmission started, in 8 kHz units.
    pub timestamp: u32,

    /// Every packet carries exactly one complete frame.
    pub marker: bool,
}

pub type H224PacketEmitter<'a> = Box<dyn FnMut(H224Packet) + 'a>;

struct Transmitter<'a> {
    on_emit: H224PacketEmitter<'a>,
    bit_position: u8,
    start_micros: u64,
}

/// H.224 protocol handler for one logical channel.
///
/// Owns the local client registry and speaks the Client Management Entity
/// (CME) protocol with the remote side: it advertises local clients, tracks
/// which remote clients exist, and dispatches received broadcast frames to
/// the matching local client.
///
/// Outgoing frames are handed to the emitter given to `start_transmit`. With
/// HDLC framing the bit position at which each frame ends is carried over to
/// the next frame.
pub struct H224Handler<'a> {
    config: H224HandlerConfig,
    registry: H224ClientRegistry<'a>,
    transmitter: Option<Transmitter<'a>>,
    receive_frame: H224Frame,
}

impl<'a> Default for H224Handler<'a> {
    fn default() -> Self {
        Self::new(H224HandlerConfig::default())
    }
}

impl<'a> H224Handler<'a> {
    pub fn new(config: H224HandlerConfig) -> Self {
        Self {
            config,
            registry: H224ClientRegistry::new(),
            transmitter: None,
            receive_frame: H224Frame::default(),
        }
    }

    pub fn config(&self) -> &H224HandlerConfig {
        &self.config
    }

    pub fn registry(&self) -> &H224ClientRegistry<'a> {
        &self.registry
    }

    pub fn add_client(&mut self, client: Box<dyn H224Client + 'a>) -> Result<(), H224HandlerError> {
        self.registry.register(client)
    }

    pub fn remove_client(&mut self, client_id: &H224ClientId) -> Option<Box<dyn H224Client + 'a>> {
        self.registry.unregister(client_id)
    }

    pub fn is_transmitting(&self) -> bool {
        self.transmitter.is_some()
    }

    /// Starts transmission and announces the local clients: the client list
    /// first, then every client's extra capabilities. Does nothing if
    /// transmission is already running.
    pub fn start_transmit<E>(&mut self, on_emit: E) -> Result<(), H224HandlerError>
    where
        E: FnMut(H224Packet) + 'a,
    {
        if self.transmitter.is_some() {
            return Ok(());
        }

        self.transmitter = Some(Transmitter {
            on_emit: Box::new(on_emit),
            bit_position: Q922_OCTET_ALIGNED_BIT_POSITION,
            start_micros: now(),
        });

        tracing::debug!(clients = self.registry.len(), "H.224 transmission started");

        self.send_client_list()?;
        self.send_extra_capabilities()
    }

    pub fn stop_transmit(&mut self) {
        if self.transmitter.take().is_some() {
            tracing::debug!("H.224 transmission stopped");
        }
    }

    /// Sends the list of all registered clients.
    pub fn send_client_list(&mut self) -> Result<(), H224HandlerError> {
        if self.transmitter.is_none() {
            return Err(H224HandlerError::TransmitDisabled);
        }

        let count = u8::try_from(self.registry.len()).map_err(|_| {
            H224HandlerError::ClientDataTooLarge {
                size: self.registry.len(),
                max: u8::MAX as usize,
            }
        })?;

        let mut data = vec![CME_CLIENT_LIST_CODE, CME_RESPONSE_MESSAGE, count];
        for (client_id, registered) in self.registry.iter() {
            client_id.write_to(&mut data, extra_capabilities_flag(registered.client()));
        }

        self.transmit_cme_frame(&data)
    }

    /// Sends the extra capabilities of every client that has some.
    pub fn send_extra_capabilities(&mut self) -> Result<(), H224HandlerError> {
        let pending: Vec<(H224ClientId, Vec<u8>)> = self
            .registry
            .iter()
            .filter(|(_, registered)| registered.client().has_extra_capabilities())
            .filter_map(|(client_id, registered)| {
                registered
                    .client()
                    .extra_capabilities()
                    .map(|capabilities| (*client_id, capabilities))
            })
            .collect();

        for (client_id, capabilities) in pending {
            self.send_extra_capabilities_message(&client_id, &capabilities)?;
        }

        Ok(())
    }

    /// Requests the remote side to send its client list.
    pub fn send_client_list_command(&mut self) -> Result<(), H224HandlerError> {
        self.transmit_cme_frame(&[CME_CLIENT_LIST_CODE, CME_RESPONSE_COMMAND])
    }

    /// Requests the remote side to send the extra capabilities of `client_id`.
    pub fn send_extra_capabilities_command(
        &mut self,
        client_id: &H224ClientId,
    ) -> Result<(), H224HandlerError> {
        let registered = self
            .registry
            .get(client_id)
            .ok_or(H224HandlerError::ClientNotRegistered(*client_id))?;

        let mut data = vec![CME_EXTRA_CAPABILITIES_CODE, CME_RESPONSE_COMMAND];
        client_id.write_to(&mut data, extra_capabilities_flag(registered.client()));

        self.transmit_cme_frame(&data)
    }

    /// Sends `capabilities` as the extra capabilities of `client_id`.
    pub fn send_extra_capabilities_message(
        &mut self,
        client_id: &H224ClientId,
        capabilities: &[u8],
    ) -> Result<(), H224HandlerError> {
        let registered = self
            .registry
            .get(client_id)
            .ok_or(H224HandlerError::ClientNotRegistered(*client_id))?;

        let mut data = vec![CME_EXTRA_CAPABILITIES_CODE, CME_RESPONSE_MESSAGE];
        client_id.write_to(&mut data, extra_capabilities_flag(registered.client()));
        data.extend_from_slice(capabilities);

        self.check_client_data_size(data.len())?;
        self.transmit_cme_frame(&data)
    }

    /// Sends a frame on behalf of a registered client.
    pub fn transmit_client_frame(
        &mut self,
        client_id: &H224ClientId,
        frame: &H224Frame,
    ) -> Result<(), H224HandlerError> {
        if !self.registry.contains(client_id) {
            return Err(H224HandlerError::ClientNotRegistered(*client_id));
        }

        self.check_client_data_size(frame.client_data_size())?;
        self.transmit_frame(frame)
    }

    /// Decodes one received packet and dispatches the frame it carries.
    pub fn handle_frame(&mut self, payload: &[u8]) -> Result<(), H224HandlerError> {
        let mut frame = std::mem::take(&mut self.receive_frame);

        let decoded = match self.config.framing {
            H224Framing::Hdlc => frame.decode_hdlc(payload),
            H224Framing::AnnexQ => frame.decode(payload),
        };

        let result = match decoded {
            Ok(()) => self.on_received_frame(&frame),
            Err(err) => {
                tracing::warn!(error = %err, "Decoding of H.224 frame failed");
                Err(err.into())
            }
        };

        self.receive_frame = frame;

        result
    }

    /// Dispatches a decoded frame to the CME or to the matching client.
    ///
    /// Only broadcast frames are handled; frames for clients that are not
    /// registered are ignored.
    pub fn on_received_frame(&mut self, frame: &H224Frame) -> Result<(), H224HandlerError> {
        if frame.destination_terminal_address() != H224_BROADCAST {
            tracing::trace!(
                destination = frame.destination_terminal_address(),
                "Received H.224 frame with non-broadcast address"
            );
            return Ok(());
        }

        let client_id = frame.client();
        if client_id.is_cme() {
            return self.on_received_cme_message(frame);
        }

        match self.registry.get_mut(&client_id) {
            Some(registered) => registered.client_mut().on_received_message(frame),
            None => tracing::trace!(?client_id, "No H.224 client for received frame"),
        }

        Ok(())
    }

    pub fn on_received_cme_message(&mut self, frame: &H224Frame) -> Result<(), H224HandlerError> {
        let data = frame.client_data();

        match (data.first().copied(), data.get(1).copied()) {
            (Some(CME_CLIENT_LIST_CODE), Some(CME_RESPONSE_MESSAGE)) => {
                self.on_received_client_list(frame);
                Ok(())
            }
            (Some(CME_CLIENT_LIST_CODE), Some(CME_RESPONSE_COMMAND)) => {
                self.on_received_client_list_command()
            }
            (Some(CME_EXTRA_CAPABILITIES_CODE), Some(CME_RESPONSE_MESSAGE)) => {
                self.on_received_extra_capabilities(frame);
                Ok(())
            }
            (Some(CME_EXTRA_CAPABILITIES_CODE), Some(CME_RESPONSE_COMMAND)) => {
                self.on_received_extra_capabilities_command()
            }
            _ => {
                tracing::trace!("Ignoring unknown CME message");
                Ok(())
            }
        }
    }

    /// Resets remote availability, then marks every listed client available.
    /// Parsing stops at the first truncated entry.
    pub fn on_received_client_list(&mut self, frame: &H224Frame) {
        self.registry.reset_remote_availability();

        let data = frame.client_data();
        let Some(&count) = data.get(2) else {
            return;
        };

        let mut index = 3;
        for _ in 0..count {
            let Some((client_id, has_extra_capabilities, consumed)) =
                data.get(index..).and_then(H224ClientId::parse)
            else {
                tracing::debug!("Truncated H.224 client list");
                break;
            };
            index += consumed;

            self.registry
                .set_remote_client_available(&client_id, true, has_extra_capabilities);
        }

        tracing::debug!(remote_clients = count, "Received H.224 client list");
    }

    pub fn on_received_client_list_command(&mut self) -> Result<(), H224HandlerError> {
        ignore_transmit_disabled(self.send_client_list())
    }

    pub fn on_received_extra_capabilities(&mut self, frame: &H224Frame) {
        let data = frame.client_data();

        let Some((client_id, _, consumed)) = data.get(2..).and_then(H224ClientId::parse) else {
            tracing::debug!("Truncated H.224 extra capabilities message");
            return;
        };

        if self
            .registry
            .set_remote_client_available(&client_id, true, true)
        {
            if let Some(registered) = self.registry.get_mut(&client_id) {
                let capabilities = data.get(2 + consumed..).unwrap_or_default();
                registered
                    .client_mut()
                    .on_received_extra_capabilities(capabilities);
            }
        }
    }

    pub fn on_received_extra_capabilities_command(&mut self) -> Result<(), H224HandlerError> {
        ignore_transmit_disabled(self.send_extra_capabilities())
    }

    fn check_client_data_size(&self, size: usize) -> Result<(), H224HandlerError> {
        if size > self.config.max_client_data_size {
            return Err(H224HandlerError::ClientDataTooLarge {
                size,
                max: self.config.max_client_data_size,
            });
        }

        Ok(())
    }

    fn transmit_cme_frame(&mut self, data: &[u8]) -> Result<(), H224HandlerError> {
        let mut frame = H224Frame::new(0);
        frame.set_high_priority(true);
        frame.set_destination_terminal_address(H224_BROADCAST);
        frame.set_source_terminal_address(H224_BROADCAST);
        frame.set_client(&H224ClientId::CME);
        frame.set_bs(true);
        frame.set_es(true);
        frame.set_client_data(data)?;

        self.transmit_frame(&frame)
    }

    fn transmit_frame(&mut self, frame: &H224Frame) -> Result<(), H224HandlerError> {
        let transmitter = self
            .transmitter
            .as_mut()
            .ok_or(H224HandlerError::TransmitDisabled)?;

        let q922_frame = frame.q922_frame();
        let encoded = match self.config.framing {
            H224Framing::AnnexQ => q922_frame.encode_annex_q_to_vec(),
            H224Framing::Hdlc => {
                let mut buf = vec![0; q922_frame.hdlc_encoded_size()];
                q922_frame
                    .encode_hdlc_at(&mut buf, transmitter.bit_position)
                    .map(|hdlc| {
                        transmitter.bit_position = hdlc.bit_position;
                        buf.truncate(hdlc.size);
                        buf
                    })
            }
        };

        let payload = encoded.inspect_err(|err| {
            tracing::warn!(error = %err, "Failed to encode H.224 frame");
        })?;

        let elapsed_millis = now().saturating_sub(transmitter.start_micros) / 1_000;
        let timestamp = elapsed_millis.wrapping_mul(H224_TIMESTAMP_UNITS_PER_MILLISECOND) as u32;

        tracing::trace!(
            size = payload.len(),
            client_id = frame.client_id(),
            "Transmitting H.224 frame"
        );

        (transmitter.on_emit)(H224Packet {
            payload,
            timestamp,
            marker: true,
        });

        Ok(())
    }
}

fn extra_capabilities_flag(client: &dyn H224Client) -> u8 {
    if client.has_extra_capabilities() {
        CME_EXTRA_CAPABILITIES_FLAG
    } else {
        0x00
    }
}

/// Replies to remote commands are best effort while transmission is stopped.
fn ignore_transmit_disabled(result: Result<(), H224HandlerError>) -> Result<(), H224HandlerError> {
    match result {
        Err(H224HandlerError::TransmitDisabled) => {
            tracing::debug!("Not replying to CME command, transmission is stopped");
            Ok(())
        }
        other => other,
    }
}
