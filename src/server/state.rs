use crate::address::AddressResolver;
use crate::location::LocationAcquirer;
use crate::session::Session;

pub struct AppState {
    pub session: Session,
    pub acquirer: LocationAcquirer,
    pub resolver: AddressResolver,
}
