use serde::{Deserialize, Serialize};

/// Symbolic icon tag for a service.
///
/// The presentation layer maps tags to renderable assets; the data model
/// never carries anything executable or renderer-specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceIcon {
    Immigration,
    Database,
    Shield,
    Globe,
}

/// A payable service a batch can be started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Service {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: ServiceIcon,
}

/// Catalog of services offered by the portal.
pub const SERVICES: &[Service] = &[
    Service {
        id: "service1",
        name: "Nigeria Immigration Service (NIS)",
        icon: ServiceIcon::Immigration,
    },
    Service {
        id: "service2",
        name: "Service2",
        icon: ServiceIcon::Database,
    },
    Service {
        id: "service3",
        name: "Service3",
        icon: ServiceIcon::Shield,
    },
    Service {
        id: "service4",
        name: "Service4",
        icon: ServiceIcon::Globe,
    },
];

/// Looks up a service by its identifier.
pub fn find_service(id: &str) -> Option<&'static Service> {
    SERVICES.iter().find(|service| service.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validate::is_valid_service_id;

    #[test]
    fn test_find_known_service() {
        let service = find_service("service1").unwrap();
        assert_eq!(service.name, "Nigeria Immigration Service (NIS)");
        assert_eq!(service.icon, ServiceIcon::Immigration);
    }

    #[test]
    fn test_find_unknown_service() {
        assert!(find_service("service99").is_none());
        assert!(find_service("").is_none());
    }

    #[test]
    fn test_catalog_ids_are_well_formed() {
        for service in SERVICES {
            assert!(is_valid_service_id(service.id), "bad id: {}", service.id);
        }
    }
}
