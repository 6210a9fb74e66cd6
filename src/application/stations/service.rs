//! Station inventory and occupancy service

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::station::{
    validate_ports, ConnectorType, NewStation, Port, Station, StationChanges, StationFilter,
    StationStatus, DEFAULT_OPERATING_HOURS,
};
use crate::domain::{DomainError, DomainResult, RepositoryProvider, User};
use crate::shared::{parse_id, PageRequest, PaginatedResult};

pub const MSG_NOT_OWNER: &str = "You do not own this station";

const MAX_NAME_LEN: usize = 100;

/// A station together with its occupancy record
#[derive(Debug, Clone)]
pub struct StationDetails {
    pub station: Station,
    pub status: Option<StationStatus>,
}

/// Service for station business operations
pub struct StationService<P: RepositoryProvider + ?Sized> {
    repos: Arc<P>,
}

impl<P: RepositoryProvider + ?Sized> StationService<P> {
    pub fn new(repos: Arc<P>) -> Self {
        Self { repos }
    }

    /// Create a station owned by `operator`, with every connector idle
    pub async fn create(&self, operator: &User, input: NewStation) -> DomainResult<StationDetails> {
        let name = required_text("name", &input.name)?;
        check_name(&name)?;
        let address = required_text("address", &input.address)?;
        validate_ports(&input.ports).map_err(DomainError::Validation)?;

        let now = Utc::now();
        let station = Station {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            operator_id: operator.id.clone(),
            location: input.location,
            address,
            ports: input.ports,
            operating_hours: operating_hours(input.operating_hours),
            status: input.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        let status = StationStatus::for_station(&station);

        self.repos.stations().create(&station, &status).await?;

        metrics::counter!("stations_created_total").increment(1);
        info!(
            station_id = %station.id,
            operator_id = %station.operator_id,
            ports = station.ports.len(),
            "Station created"
        );

        Ok(StationDetails {
            station,
            status: Some(status),
        })
    }

    pub async fn get(&self, id: &str) -> DomainResult<StationDetails> {
        let station = self.find(id).await?;
        let status = self.repos.stations().find_status(&station.id).await?;
        Ok(StationDetails { station, status })
    }

    pub async fn list(
        &self,
        filter: StationFilter,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<Station>> {
        self.repos.stations().list(&filter, page).await
    }

    /// Stations owned by `user`
    pub async fn list_mine(
        &self,
        user: &User,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<Station>> {
        let filter = StationFilter {
            operator_id: Some(user.id.clone()),
            ..Default::default()
        };
        self.repos.stations().list(&filter, page).await
    }

    /// Partial update by the owner or an admin. Port changes reconcile
    /// the occupancy record in the same transaction.
    pub async fn update(
        &self,
        user: &User,
        id: &str,
        changes: StationChanges,
    ) -> DomainResult<StationDetails> {
        let mut station = self.find_owned(user, id).await?;

        if let Some(name) = changes.name {
            let name = required_text("name", &name)?;
            check_name(&name)?;
            station.name = name;
        }
        if let Some(location) = changes.location {
            station.location = location;
        }
        if let Some(address) = changes.address {
            station.address = required_text("address", &address)?;
        }
        if let Some(hours) = changes.operating_hours {
            station.operating_hours = operating_hours(Some(hours));
        }
        if let Some(state) = changes.status {
            station.status = state;
        }

        let ports_changed = changes.ports.is_some();
        if let Some(ports) = changes.ports {
            validate_ports(&ports).map_err(DomainError::Validation)?;
            station.ports = ports;
        }

        self.save(station, ports_changed).await
    }

    /// Append one port to a station owned by `user`
    pub async fn add_port(&self, user: &User, id: &str, port: Port) -> DomainResult<StationDetails> {
        let errors = port.violations();
        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }

        let mut station = self.find_owned(user, id).await?;
        station.ports.push(port);

        let details = self.save(station, true).await?;
        info!(station_id = %details.station.id, "Port added");
        Ok(details)
    }

    pub async fn delete(&self, user: &User, id: &str) -> DomainResult<()> {
        let station = self.find_owned(user, id).await?;
        self.repos.stations().delete(&station.id).await?;
        info!(station_id = %station.id, deleted_by = %user.id, "Station deleted");
        Ok(())
    }

    /// Occupancy record of a station. A missing record is recreated.
    pub async fn get_status(&self, id: &str) -> DomainResult<StationStatus> {
        let station = self.find(id).await?;
        self.status_for(&station).await
    }

    /// Set how many points of one connector type are in use
    pub async fn set_occupancy(
        &self,
        user: &User,
        id: &str,
        connector: ConnectorType,
        occupied: u32,
    ) -> DomainResult<StationStatus> {
        let station = self.find_owned(user, id).await?;
        let status = self
            .repos
            .stations()
            .update_occupancy(&station, connector, occupied)
            .await?;

        info!(
            station_id = %station.id,
            connector = %connector,
            occupied,
            "Occupancy updated"
        );
        Ok(status)
    }

    // ── Helpers ─────────────────────────────────────────────────

    async fn find(&self, id: &str) -> DomainResult<Station> {
        let id = parse_id("id", id)?;
        self.repos
            .stations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("station", id))
    }

    /// Loads the station and checks that `user` owns it; admins bypass
    async fn find_owned(&self, user: &User, id: &str) -> DomainResult<Station> {
        let station = self.find(id).await?;
        if !user.is_admin() && !station.is_owned_by(&user.id) {
            return Err(DomainError::Forbidden(MSG_NOT_OWNER.into()));
        }
        Ok(station)
    }

    async fn status_for(&self, station: &Station) -> DomainResult<StationStatus> {
        match self.repos.stations().find_status(&station.id).await? {
            Some(status) => Ok(status),
            None => {
                let status = StationStatus::for_station(station);
                self.repos.stations().save_status(&status).await?;
                Ok(status)
            }
        }
    }

    async fn save(&self, mut station: Station, ports_changed: bool) -> DomainResult<StationDetails> {
        station.updated_at = Utc::now();

        let status = match self.repos.stations().find_status(&station.id).await? {
            Some(mut status) => {
                if ports_changed {
                    status.reconcile(&station);
                }
                status
            }
            None => StationStatus::for_station(&station),
        };
        self.repos.stations().update(&station, Some(&status)).await?;

        Ok(StationDetails {
            station,
            status: Some(status),
        })
    }
}

fn required_text(field: &str, value: &str) -> DomainResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

fn check_name(name: &str) -> DomainResult<()> {
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "Station name cannot exceed {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(())
}

fn operating_hours(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_OPERATING_HOURS.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::station::{GeoPoint, PortStatus, StationState, VehicleType};
    use crate::domain::user::NewUser;
    use crate::domain::UserRole;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::infrastructure::database::test_connection;

    struct Fixture {
        svc: StationService<SeaOrmRepositoryProvider>,
        owner: User,
        rival: User,
        admin: User,
    }

    async fn fixture() -> Fixture {
        let repos = Arc::new(SeaOrmRepositoryProvider::new(test_connection().await));
        let mut users = Vec::new();
        for (email, role) in [
            ("owner@example.com", UserRole::Operator),
            ("rival@example.com", UserRole::Operator),
            ("admin@example.com", UserRole::Admin),
        ] {
            let user = repos
                .users()
                .create_user(NewUser {
                    name: "Someone".into(),
                    email: email.into(),
                    password_hash: "x".into(),
                    role,
                    company: None,
                    phone: None,
                })
                .await
                .unwrap();
            users.push(user);
        }
        let admin = users.pop().unwrap();
        let rival = users.pop().unwrap();
        let owner = users.pop().unwrap();
        Fixture {
            svc: StationService::new(repos),
            owner,
            rival,
            admin,
        }
    }

    fn port(connector_type: ConnectorType, total: u32) -> Port {
        Port {
            connector_type,
            vehicle_type: VehicleType::Car,
            power_kw: 50.0,
            total,
            price_per_kwh: 0.4,
        }
    }

    fn new_station(ports: Vec<Port>) -> NewStation {
        NewStation {
            name: " Central Hub ".into(),
            location: GeoPoint::new(-0.12, 51.5).unwrap(),
            address: "1 Strand".into(),
            ports,
            operating_hours: None,
            status: None,
        }
    }

    #[tokio::test]
    async fn create_initializes_status() {
        let f = fixture().await;
        let details = f
            .svc
            .create(
                &f.owner,
                new_station(vec![
                    port(ConnectorType::Type2, 2),
                    port(ConnectorType::Ccs, 1),
                    port(ConnectorType::Type2, 1),
                ]),
            )
            .await
            .unwrap();

        assert_eq!(details.station.name, "Central Hub");
        assert_eq!(details.station.operating_hours, "24/7");
        assert_eq!(details.station.status, StationState::Active);
        assert_eq!(details.station.operator_id, f.owner.id);

        let status = f.svc.get_status(&details.station.id).await.unwrap();
        assert_eq!(
            status.port_status,
            vec![
                PortStatus {
                    connector_type: ConnectorType::Type2,
                    occupied: 0
                },
                PortStatus {
                    connector_type: ConnectorType::Ccs,
                    occupied: 0
                },
            ]
        );
    }

    #[tokio::test]
    async fn create_requires_ports() {
        let f = fixture().await;
        let err = f.svc.create(&f.owner, new_station(vec![])).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input data. Station must have at least one port"
        );
    }

    #[tokio::test]
    async fn only_owner_or_admin_may_modify() {
        let f = fixture().await;
        let id = f
            .svc
            .create(&f.owner, new_station(vec![port(ConnectorType::Ccs, 2)]))
            .await
            .unwrap()
            .station
            .id;

        let rename = || StationChanges {
            name: Some("Renamed".into()),
            ..Default::default()
        };

        let err = f.svc.update(&f.rival, &id, rename()).await.unwrap_err();
        assert_eq!(err.to_string(), MSG_NOT_OWNER);
        let err = f.svc.delete(&f.rival, &id).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let updated = f.svc.update(&f.admin, &id, rename()).await.unwrap();
        assert_eq!(updated.station.name, "Renamed");
        assert_eq!(updated.station.operator_id, f.owner.id);

        f.svc.delete(&f.owner, &id).await.unwrap();
        let err = f.svc.get(&id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn malformed_id_is_rejected_before_lookup() {
        let f = fixture().await;
        let err = f.svc.get("xyz").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid id: xyz");
    }

    #[tokio::test]
    async fn port_changes_reconcile_status() {
        let f = fixture().await;
        let id = f
            .svc
            .create(&f.owner, new_station(vec![port(ConnectorType::Ccs, 3)]))
            .await
            .unwrap()
            .station
            .id;
        f.svc
            .set_occupancy(&f.owner, &id, ConnectorType::Ccs, 3)
            .await
            .unwrap();

        let details = f
            .svc
            .add_port(&f.owner, &id, port(ConnectorType::Chademo, 1))
            .await
            .unwrap();
        assert_eq!(details.station.ports.len(), 2);
        let status = details.status.unwrap();
        assert_eq!(status.occupied(ConnectorType::Ccs), 3);
        assert_eq!(status.occupied(ConnectorType::Chademo), 0);

        let details = f
            .svc
            .update(
                &f.owner,
                &id,
                StationChanges {
                    ports: Some(vec![port(ConnectorType::Ccs, 1)]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let status = f.svc.get_status(&details.station.id).await.unwrap();
        assert_eq!(
            status.port_status,
            vec![PortStatus {
                connector_type: ConnectorType::Ccs,
                occupied: 1
            }]
        );
    }

    #[tokio::test]
    async fn occupancy_cannot_exceed_capacity() {
        let f = fixture().await;
        let id = f
            .svc
            .create(&f.owner, new_station(vec![port(ConnectorType::Type2, 2)]))
            .await
            .unwrap()
            .station
            .id;

        let err = f
            .svc
            .set_occupancy(&f.owner, &id, ConnectorType::Type2, 3)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::BadRequest(_)));

        let err = f
            .svc
            .set_occupancy(&f.rival, &id, ConnectorType::Type2, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn occupancy_is_persisted_and_survives_rejections() {
        let f = fixture().await;
        let id = f
            .svc
            .create(&f.owner, new_station(vec![port(ConnectorType::Type2, 2)]))
            .await
            .unwrap()
            .station
            .id;

        let status = f
            .svc
            .set_occupancy(&f.admin, &id, ConnectorType::Type2, 2)
            .await
            .unwrap();
        assert_eq!(status.occupied(ConnectorType::Type2), 2);

        assert!(f
            .svc
            .set_occupancy(&f.owner, &id, ConnectorType::Type2, 5)
            .await
            .is_err());
        let stored = f.svc.get_status(&id).await.unwrap();
        assert_eq!(stored.id, status.id);
        assert_eq!(stored.occupied(ConnectorType::Type2), 2);
    }

    #[tokio::test]
    async fn list_mine_only_returns_own_stations() {
        let f = fixture().await;
        f.svc
            .create(&f.owner, new_station(vec![port(ConnectorType::Ccs, 1)]))
            .await
            .unwrap();
        f.svc
            .create(&f.rival, new_station(vec![port(ConnectorType::Ccs, 1)]))
            .await
            .unwrap();

        let mine = f.svc.list_mine(&f.owner, PageRequest::default()).await.unwrap();
        assert_eq!(mine.total, 1);
        assert_eq!(mine.items[0].operator_id, f.owner.id);

        let all = f
            .svc
            .list(StationFilter::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(all.total, 2);
    }
}
