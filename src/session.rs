//! Per-session state shared by the acquirer and the resolver.

use crate::display::{Region, Ticket, ADDRESS_REGION, LOCATION_REGION};
use crate::location::Coordinate;
use crate::map::MapView;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Last known coordinate, the map and the two display regions.
pub struct Session {
    coordinate: Mutex<Option<Coordinate>>,
    map: Mutex<MapView>,
    location: Region,
    address: Region,
}

impl Session {
    pub fn new() -> Self {
        Self {
            coordinate: Mutex::new(None),
            map: Mutex::new(MapView::openstreetmap()),
            location: Region::new(LOCATION_REGION),
            address: Region::new(ADDRESS_REGION),
        }
    }

    /// A session that already has a fix (for testing and replays).
    pub fn with_coordinate(coordinate: Coordinate) -> Self {
        let session = Self::new();
        *lock(&session.coordinate) = Some(coordinate);
        session
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        *lock(&self.coordinate)
    }

    pub fn map(&self) -> MapView {
        lock(&self.map).clone()
    }

    pub fn location_region(&self) -> &Region {
        &self.location
    }

    pub fn address_region(&self) -> &Region {
        &self.address
    }

    /// Record a fix: coordinate, location region and map move together,
    /// or not at all when a newer request has already reported.
    pub fn apply_fix(&self, ticket: Ticket, coordinate: Coordinate, html: String) -> bool {
        self.location.write_with(ticket, html, || {
            *lock(&self.coordinate) = Some(coordinate);
            lock(&self.map).show_position(coordinate);
        })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(session.coordinate().is_none());
        assert_eq!(session.location_region().html(), "");
        assert_eq!(session.address_region().html(), "");
        assert_eq!(session.location_region().id(), "resultado");
        assert_eq!(session.address_region().id(), "resultado2");
        assert!(session.map().markers().is_empty());
    }

    #[test]
    fn test_apply_fix_updates_everything() {
        let session = Session::new();
        let here = Coordinate::new(-23.5, -46.6);
        let ticket = session.location_region().begin();

        assert!(session.apply_fix(ticket, here, "fix".into()));
        assert_eq!(session.coordinate(), Some(here));
        assert_eq!(session.location_region().html(), "fix");
        assert_eq!(session.map().center(), here);
        assert_eq!(session.map().markers().len(), 1);
    }

    #[test]
    fn test_later_fix_overwrites() {
        let session = Session::new();
        let t1 = session.location_region().begin();
        session.apply_fix(t1, Coordinate::new(1.0, 1.0), "one".into());
        let t2 = session.location_region().begin();
        session.apply_fix(t2, Coordinate::new(2.0, 2.0), "two".into());

        assert_eq!(session.coordinate(), Some(Coordinate::new(2.0, 2.0)));
    }

    #[test]
    fn test_stale_fix_is_dropped() {
        let session = Session::new();
        let old = session.location_region().begin();
        let new = session.location_region().begin();
        session.apply_fix(new, Coordinate::new(2.0, 2.0), "new".into());

        assert!(!session.apply_fix(old, Coordinate::new(1.0, 1.0), "old".into()));
        assert_eq!(session.coordinate(), Some(Coordinate::new(2.0, 2.0)));
        assert_eq!(session.location_region().html(), "new");
        assert_eq!(session.map().markers().len(), 1);
    }
}
