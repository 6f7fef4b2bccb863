use serde::{Deserialize, Serialize};

macro_rules! sqlx_text_enum {
    ($ty:ty) => {
        #[cfg(feature = "sqlx-support")]
        impl sqlx::Type<sqlx::Postgres> for $ty {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }
        }

        #[cfg(feature = "sqlx-support")]
        impl sqlx::Decode<'_, sqlx::Postgres> for $ty {
            fn decode(
                value: sqlx::postgres::PgValueRef<'_>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let raw = <String as sqlx::Decode<'_, sqlx::Postgres>>::decode(value)?;
                raw.parse::<$ty>().map_err(Into::into)
            }
        }

        #[cfg(feature = "sqlx-support")]
        impl sqlx::Encode<'_, sqlx::Postgres> for $ty {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <String as sqlx::Encode<'_, sqlx::Postgres>>::encode_by_ref(
                    &self.to_string(),
                    buf,
                )
            }
        }
    };
}

/// Shipment classification, derived at creation and never changed except by
/// explicit company/classification edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    SeaFcl,
    SeaLcl,
    Air,
    CrossBorder,
    Ground,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderType::SeaFcl => "SEA_FCL",
            OrderType::SeaLcl => "SEA_LCL",
            OrderType::Air => "AIR",
            OrderType::CrossBorder => "CROSS_BORDER",
            OrderType::Ground => "GROUND",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SEA_FCL" => Ok(OrderType::SeaFcl),
            "SEA_LCL" => Ok(OrderType::SeaLcl),
            "AIR" => Ok(OrderType::Air),
            "CROSS_BORDER" => Ok(OrderType::CrossBorder),
            "GROUND" => Ok(OrderType::Ground),
            other => Err(format!("unknown order_type {other:?}")),
        }
    }
}
sqlx_text_enum!(OrderType);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Import,
    Export,
    Domestic,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TransactionType::Import => "IMPORT",
            TransactionType::Export => "EXPORT",
            TransactionType::Domestic => "DOMESTIC",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IMPORT" => Ok(TransactionType::Import),
            "EXPORT" => Ok(TransactionType::Export),
            "DOMESTIC" => Ok(TransactionType::Domestic),
            other => Err(format!("unknown transaction_type {other:?}")),
        }
    }
}
sqlx_text_enum!(TransactionType);

/// The seven task types that may populate a shipment's workflow. POL and
/// POD are milestone-only; the rest carry an actionable responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    OriginHaulage,
    FreightBooking,
    ExportClearance,
    Pol,
    Pod,
    ImportClearance,
    DestinationHaulage,
}

impl TaskType {
    /// Canonical display order key. Levels 6 is reserved for an
    /// in-transit milestone that carries no task of its own.
    pub fn leg_level(&self) -> i16 {
        match self {
            TaskType::OriginHaulage => 1,
            TaskType::FreightBooking => 2,
            TaskType::ExportClearance => 3,
            TaskType::Pol => 4,
            TaskType::Pod => 5,
            TaskType::ImportClearance => 7,
            TaskType::DestinationHaulage => 8,
        }
    }

    pub fn is_milestone(&self) -> bool {
        matches!(self, TaskType::Pol | TaskType::Pod)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TaskType::OriginHaulage => "Origin Haulage",
            TaskType::FreightBooking => "Freight Booking",
            TaskType::ExportClearance => "Export Clearance",
            TaskType::Pol => "Port of Loading",
            TaskType::Pod => "Port of Discharge",
            TaskType::ImportClearance => "Import Clearance",
            TaskType::DestinationHaulage => "Destination Haulage",
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskType::OriginHaulage => "ORIGIN_HAULAGE",
            TaskType::FreightBooking => "FREIGHT_BOOKING",
            TaskType::ExportClearance => "EXPORT_CLEARANCE",
            TaskType::Pol => "POL",
            TaskType::Pod => "POD",
            TaskType::ImportClearance => "IMPORT_CLEARANCE",
            TaskType::DestinationHaulage => "DESTINATION_HAULAGE",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ORIGIN_HAULAGE" => Ok(TaskType::OriginHaulage),
            "FREIGHT_BOOKING" => Ok(TaskType::FreightBooking),
            "EXPORT_CLEARANCE" => Ok(TaskType::ExportClearance),
            "POL" => Ok(TaskType::Pol),
            "POD" => Ok(TaskType::Pod),
            "IMPORT_CLEARANCE" => Ok(TaskType::ImportClearance),
            "DESTINATION_HAULAGE" => Ok(TaskType::DestinationHaulage),
            other => Err(format!("unknown task_type {other:?}")),
        }
    }
}
sqlx_text_enum!(TaskType);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Blocked,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Blocked => "BLOCKED",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(TaskStatus::Pending),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "COMPLETED" => Ok(TaskStatus::Completed),
            "BLOCKED" => Ok(TaskStatus::Blocked),
            other => Err(format!("unknown task status {other:?}")),
        }
    }
}
sqlx_text_enum!(TaskStatus);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskMode {
    Assigned,
    Tracked,
    Ignored,
}

impl std::fmt::Display for TaskMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskMode::Assigned => "ASSIGNED",
            TaskMode::Tracked => "TRACKED",
            TaskMode::Ignored => "IGNORED",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for TaskMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASSIGNED" => Ok(TaskMode::Assigned),
            "TRACKED" => Ok(TaskMode::Tracked),
            "IGNORED" => Ok(TaskMode::Ignored),
            other => Err(format!("unknown task mode {other:?}")),
        }
    }
}
sqlx_text_enum!(TaskMode);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignedTo {
    Af,
    Customer,
    ThirdParty,
}

impl std::fmt::Display for AssignedTo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AssignedTo::Af => "AF",
            AssignedTo::Customer => "CUSTOMER",
            AssignedTo::ThirdParty => "THIRD_PARTY",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for AssignedTo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AF" => Ok(AssignedTo::Af),
            "CUSTOMER" => Ok(AssignedTo::Customer),
            "THIRD_PARTY" => Ok(AssignedTo::ThirdParty),
            other => Err(format!("unknown assigned_to {other:?}")),
        }
    }
}
sqlx_text_enum!(AssignedTo);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    Visible,
    Hidden,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Visibility::Visible => "VISIBLE",
            Visibility::Hidden => "HIDDEN",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VISIBLE" => Ok(Visibility::Visible),
            "HIDDEN" => Ok(Visibility::Hidden),
            other => Err(format!("unknown visibility {other:?}")),
        }
    }
}
sqlx_text_enum!(Visibility);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RouteRole {
    Origin,
    Transship,
    Destination,
}

impl std::fmt::Display for RouteRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RouteRole::Origin => "ORIGIN",
            RouteRole::Transship => "TRANSHIP",
            RouteRole::Destination => "DESTINATION",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for RouteRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ORIGIN" => Ok(RouteRole::Origin),
            "TRANSHIP" => Ok(RouteRole::Transship),
            "DESTINATION" => Ok(RouteRole::Destination),
            other => Err(format!("unknown route node role {other:?}")),
        }
    }
}
sqlx_text_enum!(RouteRole);

/// Internal staff vs. external client-company account type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    #[serde(rename = "AFU")]
    Afu,
    #[serde(rename = "AFC")]
    Afc,
}

/// Role granted to a user, scoping what they may do through the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "AFU-ADMIN")]
    AfuAdmin,
    #[serde(rename = "AFU-SM")]
    AfuSalesManager,
    #[serde(rename = "AFU-SE")]
    AfuSalesExecutive,
    #[serde(rename = "AFC-ADMIN")]
    AfcAdmin,
    #[serde(rename = "AFC-M")]
    AfcManager,
    #[serde(rename = "AFC-REGULAR")]
    AfcRegular,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::AfuAdmin => "AFU-ADMIN",
            Role::AfuSalesManager => "AFU-SM",
            Role::AfuSalesExecutive => "AFU-SE",
            Role::AfcAdmin => "AFC-ADMIN",
            Role::AfcManager => "AFC-M",
            Role::AfcRegular => "AFC-REGULAR",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AFU-ADMIN" => Ok(Role::AfuAdmin),
            "AFU-SM" => Ok(Role::AfuSalesManager),
            "AFU-SE" => Ok(Role::AfuSalesExecutive),
            "AFC-ADMIN" => Ok(Role::AfcAdmin),
            "AFC-M" => Ok(Role::AfcManager),
            "AFC-REGULAR" => Ok(Role::AfcRegular),
            other => Err(format!("unknown role {other:?}")),
        }
    }
}

impl Role {
    pub fn account_type(&self) -> AccountType {
        match self {
            Role::AfuAdmin | Role::AfuSalesManager | Role::AfuSalesExecutive => AccountType::Afu,
            Role::AfcAdmin | Role::AfcManager | Role::AfcRegular => AccountType::Afc,
        }
    }

    pub fn is_afu(&self) -> bool {
        matches!(self.account_type(), AccountType::Afu)
    }

    pub fn is_afc(&self) -> bool {
        matches!(self.account_type(), AccountType::Afc)
    }

    pub fn is_afc_manager_or_admin(&self) -> bool {
        matches!(self, Role::AfcAdmin | Role::AfcManager)
    }
}
