//! Address resolver: session coordinate → geocoder → address region.

use super::nominatim::ReverseGeocoder;
use super::types::{AddressDetails, ResolveError};
use crate::display;
use crate::session::Session;
use std::sync::Arc;

pub struct AddressResolver {
    geocoder: Arc<dyn ReverseGeocoder>,
}

impl AddressResolver {
    pub fn new(geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self { geocoder }
    }

    /// Look up the address of the session's last fix and show it.
    ///
    /// Without a fix this writes a prompt and makes no request. Every lookup
    /// failure collapses into [`ResolveError::LookupFailed`]; its cause goes
    /// to the log only.
    pub async fn resolve_address(&self, session: &Session) -> Result<AddressDetails, ResolveError> {
        let region = session.address_region();
        let ticket = region.begin();

        let Some(coordinate) = session.coordinate() else {
            let err = ResolveError::CoordinatesMissing;
            region.write(ticket, err.to_string());
            return Err(err);
        };

        match self.geocoder.reverse(coordinate).await {
            Ok(details) => {
                region.write(ticket, display::address_html(&details, coordinate));
                Ok(details)
            }
            Err(cause) => {
                log::error!("Erro ao buscar dados: {cause}");
                let err = ResolveError::LookupFailed(cause);
                region.write(ticket, err.to_string());
                Err(err)
            }
        }
    }
}
