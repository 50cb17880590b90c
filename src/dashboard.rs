use std::future::Future;

use tracing::warn;

use crate::api::{self, ApiClient};
use crate::attendance::{AttendanceSnapshot, AttendanceTracker};
use crate::error::{PortalError, Result};
use crate::model::RequestStatus;
use crate::model::role::Role;

#[derive(Debug, Clone)]
pub struct AdminDashboard {
    pub employee_count: u64,
    pub pending_requests: u64,
    pub today: AttendanceSnapshot,
}

#[derive(Debug, Clone)]
pub struct EmployeeDashboard {
    pub pending_requests: u64,
    pub today: AttendanceSnapshot,
}

/// Auxiliary figures never block the dashboard: log and show zero.
async fn or_zero<F>(what: &'static str, fut: F) -> u64
where
    F: Future<Output = Result<u64>>,
{
    match fut.await {
        Ok(n) => n,
        Err(e) => {
            warn!(error = %e, what, "dashboard figure unavailable, showing 0");
            0
        }
    }
}

fn pending<T>(items: &[T], status: impl Fn(&T) -> RequestStatus) -> u64 {
    items.iter().filter(|i| status(i) == RequestStatus::Pending).count() as u64
}

/// Loads today's attendance into `tracker` (errors propagate) alongside the
/// admin's auxiliary counts (errors degrade).
pub async fn admin(client: &ApiClient, tracker: &mut AttendanceTracker) -> Result<AdminDashboard> {
    client.session().require_admin()?;

    let employees = or_zero("employee count", api::user::count(client, Role::Employee));
    let leaves = or_zero("pending leaves", async {
        let leaves = api::leave_request::list(client).await?;
        Ok::<_, PortalError>(pending(&leaves, |l| l.status))
    });
    let wfh = or_zero("pending wfh", async {
        let wfh = api::wfh::list(client).await?;
        Ok::<_, PortalError>(pending(&wfh, |w| w.status))
    });

    let (today, employee_count, pending_leaves, pending_wfh) =
        futures::join!(tracker.load(), employees, leaves, wfh);
    let today = today?.clone();

    Ok(AdminDashboard {
        employee_count,
        pending_requests: pending_leaves + pending_wfh,
        today,
    })
}

pub async fn employee(client: &ApiClient, tracker: &mut AttendanceTracker) -> Result<EmployeeDashboard> {
    client.session().require()?;

    let leaves = or_zero("my pending leaves", async {
        let leaves = api::leave_request::my_leaves(client).await?;
        Ok::<_, PortalError>(pending(&leaves, |l| l.status))
    });
    let payments = or_zero("my pending payments", async {
        let requests = api::payment_request::my_requests(client).await?;
        Ok::<_, PortalError>(pending(&requests, |p| p.status))
    });

    let (today, pending_leaves, pending_payments) = futures::join!(tracker.load(), leaves, payments);
    let today = today?.clone();

    Ok(EmployeeDashboard {
        pending_requests: pending_leaves + pending_payments,
        today,
    })
}
