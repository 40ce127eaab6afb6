//! The static resource table.
//!
//! Entries are listed in `ResourceName` declaration order. Field schemas are
//! not declared here; they come from the platform's API description.

use mkt_model::ResourceName as R;

use crate::metadata::{ForeignKey as Fk, ResourceMetadata as M};

#[rustfmt::skip]
pub(crate) fn builtin_entries() -> Vec<M> {
    vec![
        M::object(R::SecurityProfiles, "SecurityProfile", "/securityprofiles",
            ("SecurityProfiles.List", "SecurityProfiles.Create"), 1),
        M::object(R::ImpersonationConfigs, "ImpersonationConfig", "/impersonationconfig",
            ("ImpersonationConfigs.List", "ImpersonationConfigs.Create"), 6)
            .with_keys(&[
                Fk::to("ClientID", R::ApiClients),
                Fk::to("SecurityProfileID", R::SecurityProfiles),
                Fk::to("BuyerID", R::Buyers),
                Fk::to("GroupID", R::UserGroups).custom(),
                Fk::to("UserID", R::Users).custom(),
                Fk::to("ImpersonationBuyerID", R::Buyers),
                Fk::to("ImpersonationGroupID", R::AdminUserGroups).custom(),
                Fk::to("ImpersonationUserID", R::AdminUsers).custom(),
            ]),
        M::object(R::OpenIdConnects, "OpenIdConnect", "/openidconnects",
            ("OpenIdConnects.List", "OpenIdConnects.Create"), 6)
            .with_keys(&[
                Fk::to("OrderCloudApiClientID", R::ApiClients),
                Fk::to("IntegrationEventID", R::IntegrationEvents),
            ])
            .redacting(&["ConnectClientSecret"]),
        M::object(R::AdminUsers, "AdminUser", "/adminusers",
            ("AdminUsers.List", "AdminUsers.Create"), 1)
            .with_username(),
        M::object(R::AdminUserGroups, "AdminUserGroup", "/usergroups",
            ("AdminUserGroups.List", "AdminUserGroups.Create"), 1),
        M::object(R::AdminAddresses, "AdminAddress", "/addresses",
            ("AdminAddresses.List", "AdminAddresses.Create"), 1),
        M::object(R::MessageSenders, "MessageSender", "/messagesenders",
            ("MessageSenders.List", "MessageSenders.Create"), 1)
            .redacting(&["SharedKey"]),
        M::object(R::IntegrationEvents, "IntegrationEvent", "/integrationEvents",
            ("IntegrationEvents.List", "IntegrationEvents.Create"), 1)
            .redacting(&["HashKey"]),
        M::object(R::ApiClients, "ApiClient", "/apiclients",
            ("ApiClients.List", "ApiClients.Create"), 5)
            .with_keys(&[
                Fk::to("DefaultContextUserName", R::Users).custom(),
                Fk::to("OrderCheckoutIntegrationEventID", R::IntegrationEvents).custom(),
                Fk::to("OrderReturnIntegrationEventID", R::IntegrationEvents).custom(),
            ])
            .redacting(&["ClientSecret"]),
        M::object(R::Webhooks, "Webhook", "/webhooks",
            ("Webhooks.List", "Webhooks.Create"), 6)
            .with_keys(&[Fk::to("ApiClientIDs", R::ApiClients).many().custom()])
            .redacting(&["HashKey"]),
        M::object(R::Incrementors, "Incrementor", "/incrementors",
            ("Incrementors.List", "Incrementors.Create"), 1),
        M::object(R::XpIndices, "XpIndex", "/xpindices",
            ("XpIndices.List", "XpIndices.Put"), 1)
            .without_id()
            .created_by_put(),
        M::object(R::Locales, "Locale", "/locales",
            ("Locales.List", "Locales.Create"), 2)
            .owned(),
        M::object(R::Suppliers, "Supplier", "/suppliers",
            ("Suppliers.List", "Suppliers.Create"), 1),
        M::object(R::SupplierUsers, "SupplierUser", "/suppliers/{supplierID}/users",
            ("SupplierUsers.List", "SupplierUsers.Create"), 2)
            .child_of(R::Suppliers, "SupplierID")
            .with_username(),
        M::object(R::SupplierUserGroups, "SupplierUserGroup", "/suppliers/{supplierID}/usergroups",
            ("SupplierUserGroups.List", "SupplierUserGroups.Create"), 2)
            .child_of(R::Suppliers, "SupplierID"),
        M::object(R::SupplierAddresses, "SupplierAddress", "/suppliers/{supplierID}/addresses",
            ("SupplierAddresses.List", "SupplierAddresses.Create"), 2)
            .child_of(R::Suppliers, "SupplierID"),
        M::object(R::Catalogs, "Catalog", "/catalogs",
            ("Catalogs.List", "Catalogs.Create"), 2)
            .owned(),
        M::object(R::Categories, "Category", "/catalogs/{catalogID}/categories",
            ("Categories.List", "Categories.Create"), 3)
            .child_of(R::Catalogs, "CatalogID")
            .with_keys(&[Fk::to("ParentID", R::Categories).scoped_by("CatalogID")]),
        M::object(R::Buyers, "Buyer", "/buyers",
            ("Buyers.List", "Buyers.Create"), 3)
            .with_keys(&[Fk::to("DefaultCatalogID", R::Catalogs)]),
        M::object(R::Users, "User", "/buyers/{buyerID}/users",
            ("Users.List", "Users.Create"), 4)
            .child_of(R::Buyers, "BuyerID")
            .with_username(),
        M::object(R::UserGroups, "UserGroup", "/buyers/{buyerID}/usergroups",
            ("UserGroups.List", "UserGroups.Create"), 4)
            .child_of(R::Buyers, "BuyerID"),
        M::object(R::Addresses, "Address", "/buyers/{buyerID}/addresses",
            ("Addresses.List", "Addresses.Create"), 4)
            .child_of(R::Buyers, "BuyerID"),
        M::object(R::CostCenters, "CostCenter", "/buyers/{buyerID}/costcenters",
            ("CostCenters.List", "CostCenters.Create"), 4)
            .child_of(R::Buyers, "BuyerID"),
        M::object(R::CreditCards, "CreditCard", "/buyers/{buyerID}/creditcards",
            ("CreditCards.List", "CreditCards.Create"), 4)
            .child_of(R::Buyers, "BuyerID"),
        M::object(R::SpendingAccounts, "SpendingAccount", "/buyers/{buyerID}/spendingaccounts",
            ("SpendingAccounts.List", "SpendingAccounts.Create"), 4)
            .child_of(R::Buyers, "BuyerID"),
        M::object(R::ApprovalRules, "ApprovalRule", "/buyers/{buyerID}/approvalrules",
            ("ApprovalRules.List", "ApprovalRules.Create"), 5)
            .child_of(R::Buyers, "BuyerID")
            .with_keys(&[Fk::to("ApprovingGroupID", R::UserGroups).scoped_by("BuyerID")]),
        M::object(R::PriceSchedules, "PriceSchedule", "/priceschedules",
            ("PriceSchedules.List", "PriceSchedules.Create"), 2)
            .owned(),
        M::object(R::Specs, "Spec", "/specs",
            ("Specs.List", "Specs.Create"), 2)
            .with_keys(&[Fk::to("DefaultOptionID", R::SpecOptions).scoped_by("ID")])
            .owned(),
        M::object(R::SpecOptions, "SpecOption", "/specs/{specID}/options",
            ("Specs.ListOptions", "Specs.CreateOption"), 3)
            .child_of(R::Specs, "SpecID"),
        M::object(R::ProductFacets, "ProductFacet", "/productfacets",
            ("ProductFacets.List", "ProductFacets.Create"), 1),
        M::object(R::Promotions, "Promotion", "/promotions",
            ("Promotions.List", "Promotions.Create"), 2)
            .owned(),
        M::object(R::Products, "Product", "/products",
            ("Products.List", "Products.Create"), 4)
            .with_keys(&[
                Fk::to("DefaultPriceScheduleID", R::PriceSchedules),
                Fk::to("DefaultSupplierID", R::Suppliers),
                Fk::to("ShipFromAddressID", R::AdminAddresses).custom(),
            ])
            .owned(),
        M::object(R::Variants, "Variant", "/products/{productID}/variants",
            ("Products.ListVariants", "Products.SaveVariant"), 8)
            .child_of(R::Products, "ProductID"),
        M::object(R::InventoryRecords, "InventoryRecord", "/products/{productID}/inventoryrecords",
            ("InventoryRecords.List", "InventoryRecords.Create"), 6)
            .child_of(R::Products, "ProductID")
            .with_keys(&[Fk::to("AddressID", R::AdminAddresses).custom()])
            .owned(),
        M::object(R::VariantInventoryRecords, "VariantInventoryRecord",
            "/products/{productID}/variants/{variantID}/inventoryrecords",
            ("InventoryRecords.ListVariant", "InventoryRecords.CreateVariant"), 9)
            .child_of(R::Variants, "VariantID")
            .with_keys(&[Fk::to("AddressID", R::AdminAddresses).custom()])
            .owned(),
        M::object(R::SellerApprovalRules, "SellerApprovalRule", "/approvalrules",
            ("SellerApprovalRules.List", "SellerApprovalRules.Create"), 3)
            .with_keys(&[Fk::to("ApprovingGroupID", R::AdminUserGroups).custom()])
            .owned(),
        M::assignment(R::SecurityProfileAssignments, "SecurityProfileAssignment",
            "/securityprofiles/assignments",
            ("SecurityProfiles.ListAssignments", "SecurityProfiles.SaveAssignment"))
            .with_keys(&[
                Fk::to("SecurityProfileID", R::SecurityProfiles),
                Fk::to("BuyerID", R::Buyers),
                Fk::to("SupplierID", R::Suppliers),
                Fk::to("UserID", R::Users).custom(),
                Fk::to("UserGroupID", R::UserGroups).custom(),
            ]),
        M::assignment(R::AdminUserGroupAssignments, "UserGroupAssignment", "/usergroups/assignments",
            ("AdminUserGroups.ListUserAssignments", "AdminUserGroups.SaveUserAssignment"))
            .with_keys(&[
                Fk::to("UserGroupID", R::AdminUserGroups),
                Fk::to("UserID", R::AdminUsers),
            ]),
        M::assignment(R::ApiClientAssignments, "ApiClientAssignment", "/apiclients/assignments",
            ("ApiClients.ListAssignments", "ApiClients.SaveAssignment"))
            .with_keys(&[
                Fk::to("ApiClientID", R::ApiClients),
                Fk::to("BuyerID", R::Buyers),
                Fk::to("SupplierID", R::Suppliers),
            ]),
        M::assignment(R::MessageSenderAssignments, "MessageSenderAssignment",
            "/messagesenders/assignments",
            ("MessageSenders.ListAssignments", "MessageSenders.SaveAssignment"))
            .with_keys(&[
                Fk::to("MessageSenderID", R::MessageSenders),
                Fk::to("BuyerID", R::Buyers),
                Fk::to("UserGroupID", R::UserGroups).scoped_by("BuyerID"),
                Fk::to("SupplierID", R::Suppliers),
            ]),
        M::assignment(R::LocaleAssignments, "LocaleAssignment", "/locales/assignments",
            ("Locales.ListAssignments", "Locales.SaveAssignment"))
            .with_keys(&[
                Fk::to("LocaleID", R::Locales),
                Fk::to("BuyerID", R::Buyers),
                Fk::to("UserGroupID", R::UserGroups).scoped_by("BuyerID"),
            ]),
        M::assignment(R::SupplierUserGroupsAssignments, "UserGroupAssignment",
            "/suppliers/{supplierID}/usergroups/assignments",
            ("SupplierUserGroups.ListUserAssignments", "SupplierUserGroups.SaveUserAssignment"))
            .child_of(R::Suppliers, "SupplierID")
            .with_keys(&[
                Fk::to("UserGroupID", R::SupplierUserGroups).scoped_by("SupplierID"),
                Fk::to("UserID", R::SupplierUsers).scoped_by("SupplierID"),
            ]),
        M::assignment(R::CatalogAssignments, "CatalogAssignment", "/catalogs/assignments",
            ("Catalogs.ListAssignments", "Catalogs.SaveAssignment"))
            .with_keys(&[
                Fk::to("CatalogID", R::Catalogs),
                Fk::to("BuyerID", R::Buyers),
            ]),
        M::assignment(R::CategoryAssignments, "CategoryAssignment",
            "/catalogs/{catalogID}/categories/assignments",
            ("Categories.ListAssignments", "Categories.SaveAssignment"))
            .child_of(R::Catalogs, "CatalogID")
            .with_keys(&[
                Fk::to("CategoryID", R::Categories).scoped_by("CatalogID"),
                Fk::to("BuyerID", R::Buyers),
                Fk::to("UserGroupID", R::UserGroups).scoped_by("BuyerID"),
            ]),
        M::assignment(R::CategoryProductAssignments, "CategoryProductAssignment",
            "/catalogs/{catalogID}/categories/productassignments",
            ("Categories.ListProductAssignments", "Categories.SaveProductAssignment"))
            .child_of(R::Catalogs, "CatalogID")
            .with_keys(&[
                Fk::to("CategoryID", R::Categories).scoped_by("CatalogID"),
                Fk::to("ProductID", R::Products),
            ]),
        M::assignment(R::CatalogProductAssignments, "ProductCatalogAssignment",
            "/catalogs/productassignments",
            ("Catalogs.ListProductAssignments", "Catalogs.SaveProductAssignment"))
            .with_keys(&[
                Fk::to("CatalogID", R::Catalogs),
                Fk::to("ProductID", R::Products),
            ]),
        M::assignment(R::UserGroupAssignments, "UserGroupAssignment",
            "/buyers/{buyerID}/usergroups/assignments",
            ("UserGroups.ListUserAssignments", "UserGroups.SaveUserAssignment"))
            .child_of(R::Buyers, "BuyerID")
            .with_keys(&[
                Fk::to("UserGroupID", R::UserGroups).scoped_by("BuyerID"),
                Fk::to("UserID", R::Users).scoped_by("BuyerID"),
            ]),
        M::assignment(R::AddressAssignments, "AddressAssignment",
            "/buyers/{buyerID}/addresses/assignments",
            ("Addresses.ListAssignments", "Addresses.SaveAssignment"))
            .child_of(R::Buyers, "BuyerID")
            .with_keys(&[
                Fk::to("AddressID", R::Addresses).scoped_by("BuyerID"),
                Fk::to("UserID", R::Users).scoped_by("BuyerID"),
                Fk::to("UserGroupID", R::UserGroups).scoped_by("BuyerID"),
            ]),
        M::assignment(R::CostCenterAssignments, "CostCenterAssignment",
            "/buyers/{buyerID}/costcenters/assignments",
            ("CostCenters.ListAssignments", "CostCenters.SaveAssignment"))
            .child_of(R::Buyers, "BuyerID")
            .with_keys(&[
                Fk::to("CostCenterID", R::CostCenters).scoped_by("BuyerID"),
                Fk::to("UserGroupID", R::UserGroups).scoped_by("BuyerID"),
            ]),
        M::assignment(R::CreditCardAssignments, "CreditCardAssignment",
            "/buyers/{buyerID}/creditcards/assignments",
            ("CreditCards.ListAssignments", "CreditCards.SaveAssignment"))
            .child_of(R::Buyers, "BuyerID")
            .with_keys(&[
                Fk::to("CreditCardID", R::CreditCards).scoped_by("BuyerID"),
                Fk::to("UserID", R::Users).scoped_by("BuyerID"),
                Fk::to("UserGroupID", R::UserGroups).scoped_by("BuyerID"),
            ]),
        M::assignment(R::SpendingAccountAssignments, "SpendingAccountAssignment",
            "/buyers/{buyerID}/spendingaccounts/assignments",
            ("SpendingAccounts.ListAssignments", "SpendingAccounts.SaveAssignment"))
            .child_of(R::Buyers, "BuyerID")
            .with_keys(&[
                Fk::to("SpendingAccountID", R::SpendingAccounts).scoped_by("BuyerID"),
                Fk::to("UserID", R::Users).scoped_by("BuyerID"),
                Fk::to("UserGroupID", R::UserGroups).scoped_by("BuyerID"),
            ]),
        M::assignment(R::ProductAssignments, "ProductAssignment", "/products/assignments",
            ("Products.ListAssignments", "Products.SaveAssignment"))
            .with_keys(&[
                Fk::to("ProductID", R::Products),
                Fk::to("BuyerID", R::Buyers),
                Fk::to("UserGroupID", R::UserGroups).scoped_by("BuyerID"),
                Fk::to("PriceScheduleID", R::PriceSchedules),
            ]),
        M::assignment(R::SpecProductAssignments, "SpecProductAssignment",
            "/specs/productassignments",
            ("Specs.ListProductAssignments", "Specs.SaveProductAssignment"))
            .with_keys(&[
                Fk::to("SpecID", R::Specs),
                Fk::to("ProductID", R::Products),
                Fk::to("DefaultOptionID", R::SpecOptions).scoped_by("SpecID"),
            ]),
        M::assignment(R::PromotionAssignments, "PromotionAssignment", "/promotions/assignments",
            ("Promotions.ListAssignments", "Promotions.SaveAssignment"))
            .with_keys(&[
                Fk::to("PromotionID", R::Promotions),
                Fk::to("BuyerID", R::Buyers),
                Fk::to("UserGroupID", R::UserGroups).scoped_by("BuyerID"),
            ]),
    ]
}
