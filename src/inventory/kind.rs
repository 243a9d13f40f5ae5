//! Resource kinds and how each one is queried

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a kind's listing is issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// One call covers the project (or one region of it); any failure is fatal
    Project,
    /// One call per zone of a region; per-zone failures are absorbed
    Zone,
}

/// Whether a kind is backed by a real query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Implemented { scope: Scope, regional: bool },
    NotImplemented,
}

impl Capability {
    pub fn is_implemented(&self) -> bool {
        matches!(self, Capability::Implemented { .. })
    }
}

/// Every resource kind the inventory knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    ComputeInstance,
    PersistentDisk,
    StorageBucket,
    VpcNetwork,
    Subnet,
    FirewallRule,
    CloudSqlInstance,
    GkeCluster,
    CloudSqlDatabase,
    CloudSqlUser,
    ProjectIamPolicy,
    ServiceAccount,
    ServiceAccountKey,
    ServiceAccountIamPolicy,
    CustomRole,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 15] = [
        ResourceKind::ComputeInstance,
        ResourceKind::PersistentDisk,
        ResourceKind::StorageBucket,
        ResourceKind::VpcNetwork,
        ResourceKind::Subnet,
        ResourceKind::FirewallRule,
        ResourceKind::CloudSqlInstance,
        ResourceKind::GkeCluster,
        ResourceKind::CloudSqlDatabase,
        ResourceKind::CloudSqlUser,
        ResourceKind::ProjectIamPolicy,
        ResourceKind::ServiceAccount,
        ResourceKind::ServiceAccountKey,
        ResourceKind::ServiceAccountIamPolicy,
        ResourceKind::CustomRole,
    ];

    pub fn capability(self) -> Capability {
        use ResourceKind::*;
        match self {
            ComputeInstance | PersistentDisk => Capability::Implemented {
                scope: Scope::Zone,
                regional: true,
            },
            Subnet => Capability::Implemented {
                scope: Scope::Project,
                regional: true,
            },
            StorageBucket | VpcNetwork | FirewallRule | CloudSqlInstance => Capability::Implemented {
                scope: Scope::Project,
                regional: false,
            },
            GkeCluster | CloudSqlDatabase | CloudSqlUser | ProjectIamPolicy | ServiceAccount
            | ServiceAccountKey | ServiceAccountIamPolicy | CustomRole => Capability::NotImplemented,
        }
    }

    /// Whether a query for this kind takes a region argument
    pub fn is_regional(self) -> bool {
        matches!(self.capability(), Capability::Implemented { regional: true, .. })
    }

    /// Stable identifier used on the command line and in JSON output
    pub fn key(self) -> &'static str {
        use ResourceKind::*;
        match self {
            ComputeInstance => "compute-instance",
            PersistentDisk => "persistent-disk",
            StorageBucket => "storage-bucket",
            VpcNetwork => "vpc-network",
            Subnet => "subnet",
            FirewallRule => "firewall-rule",
            CloudSqlInstance => "cloud-sql-instance",
            GkeCluster => "gke-cluster",
            CloudSqlDatabase => "cloud-sql-database",
            CloudSqlUser => "cloud-sql-user",
            ProjectIamPolicy => "project-iam-policy",
            ServiceAccount => "service-account",
            ServiceAccountKey => "service-account-key",
            ServiceAccountIamPolicy => "service-account-iam-policy",
            CustomRole => "custom-role",
        }
    }

    /// Plural human-readable name, used in error messages
    pub fn display_name(self) -> &'static str {
        use ResourceKind::*;
        match self {
            ComputeInstance => "compute instances",
            PersistentDisk => "persistent disks",
            StorageBucket => "storage buckets",
            VpcNetwork => "VPC networks",
            Subnet => "subnets",
            FirewallRule => "firewall rules",
            CloudSqlInstance => "Cloud SQL instances",
            GkeCluster => "GKE clusters",
            CloudSqlDatabase => "Cloud SQL databases",
            CloudSqlUser => "Cloud SQL users",
            ProjectIamPolicy => "project IAM policy",
            ServiceAccount => "service accounts",
            ServiceAccountKey => "service account keys",
            ServiceAccountIamPolicy => "service account IAM policy",
            CustomRole => "custom roles",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|k| k.key() == s)
            .ok_or_else(|| format!("unknown resource kind: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_scoped_kinds() {
        let zone_scoped: Vec<_> = ResourceKind::ALL
            .into_iter()
            .filter(|k| matches!(k.capability(), Capability::Implemented { scope: Scope::Zone, .. }))
            .collect();
        assert_eq!(
            zone_scoped,
            [ResourceKind::ComputeInstance, ResourceKind::PersistentDisk]
        );
    }

    #[test]
    fn test_subnets_are_project_scoped_but_regional() {
        assert_eq!(
            ResourceKind::Subnet.capability(),
            Capability::Implemented {
                scope: Scope::Project,
                regional: true
            }
        );
        assert!(!ResourceKind::FirewallRule.is_regional());
    }

    #[test]
    fn test_placeholder_kinds_not_implemented() {
        for kind in [
            ResourceKind::GkeCluster,
            ResourceKind::CloudSqlDatabase,
            ResourceKind::CloudSqlUser,
            ResourceKind::ProjectIamPolicy,
            ResourceKind::ServiceAccount,
            ResourceKind::ServiceAccountKey,
            ResourceKind::ServiceAccountIamPolicy,
            ResourceKind::CustomRole,
        ] {
            assert!(!kind.capability().is_implemented(), "{} should be a stub", kind.key());
        }
        assert!(ResourceKind::CloudSqlInstance.capability().is_implemented());
    }

    #[test]
    fn test_key_round_trip() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.key().parse::<ResourceKind>(), Ok(kind));
        }
        assert!("nope".parse::<ResourceKind>().is_err());
    }
}
