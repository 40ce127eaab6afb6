use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

macro_rules! resource_names {
    ($($variant:ident),+ $(,)?) => {
        /// Every resource type the platform exposes for seeding.
        ///
        /// Variants are declared in directory order. The derived `Ord` follows
        /// that order, so maps keyed by `ResourceName` iterate the way the
        /// directory is declared.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum ResourceName {
            $($variant),+
        }

        impl ResourceName {
            /// All resource names in declaration order.
            pub const ALL: &'static [ResourceName] = &[$(ResourceName::$variant),+];

            /// Returns the document key for this resource (e.g. "Buyers").
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(ResourceName::$variant => stringify!($variant)),+
                }
            }
        }
    };
}

resource_names! {
    SecurityProfiles,
    ImpersonationConfigs,
    OpenIdConnects,
    AdminUsers,
    AdminUserGroups,
    AdminAddresses,
    MessageSenders,
    IntegrationEvents,
    ApiClients,
    Webhooks,
    Incrementors,
    XpIndices,
    Locales,
    Suppliers,
    SupplierUsers,
    SupplierUserGroups,
    SupplierAddresses,
    Catalogs,
    Categories,
    Buyers,
    Users,
    UserGroups,
    Addresses,
    CostCenters,
    CreditCards,
    SpendingAccounts,
    ApprovalRules,
    PriceSchedules,
    Specs,
    SpecOptions,
    ProductFacets,
    Promotions,
    Products,
    Variants,
    InventoryRecords,
    VariantInventoryRecords,
    SellerApprovalRules,
    SecurityProfileAssignments,
    AdminUserGroupAssignments,
    ApiClientAssignments,
    MessageSenderAssignments,
    LocaleAssignments,
    SupplierUserGroupsAssignments,
    CatalogAssignments,
    CategoryAssignments,
    CategoryProductAssignments,
    CatalogProductAssignments,
    UserGroupAssignments,
    AddressAssignments,
    CostCenterAssignments,
    CreditCardAssignments,
    SpendingAccountAssignments,
    ProductAssignments,
    SpecProductAssignments,
    PromotionAssignments,
}

/// Error returned when a document names a resource type the tool does not know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource type: {0}")]
pub struct UnknownResource(pub String);

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceName {
    type Err = UnknownResource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ResourceName::ALL
            .iter()
            .find(|name| name.as_str() == trimmed)
            .copied()
            .ok_or_else(|| UnknownResource(trimmed.to_string()))
    }
}

impl Serialize for ResourceName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ResourceName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
