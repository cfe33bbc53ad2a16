//! Pending to active activation shared by every Change Cipher Spec handler.
//!
//! Activation is staged: the new pending and active sets are built as
//! detached values and the Finished value is computed before anything on the
//! connection changes. Only infallible assignments happen after that point,
//! so a failure at any step leaves the connection exactly as it was.
//!
//! 所有 Change Cipher Spec 处理函数共用的 pending 到 active 激活逻辑。
//! 激活过程先在独立的副本上完成，并在修改连接之前算出 Finished 值；
//! 之后只执行不会失败的赋值，因此任何一步失败都不会留下部分状态。

use crate::connection::{Connection, ParamSlot};
use crate::crypto::finished::{FinishedGenerator, FinishedInputs, VerifyData};
use crate::crypto::keys::SecurityParameters;
use crate::error::{HandshakeError, Result, TransitionStep};
use crate::protocol::message::ChangeCipherSpec;
use crate::protocol::state::Role;
use tracing::{debug, warn};

/// The parameter sets a committed activation will install.
struct StagedActivation {
    pending: SecurityParameters,
    active: SecurityParameters,
}

/// Steps 1 and 2: reset the direction's sequence register in a copy of
/// `pending` and derive the next `active` from it.
///
/// A direction already protected by `active` keeps its own fields, so its
/// running sequence register is never reset outside its own activation.
fn stage_activation<F>(conn: &Connection<F>, direction: Role) -> Result<StagedActivation> {
    let mut pending = conn.pending.try_clone().map_err(|_| HandshakeError::State {
        step: TransitionStep::ResetSequenceNumber,
        reason: "allocation failed while copying pending parameters",
    })?;
    pending.sequence_number_mut(direction).reset();

    let copy_failed = |_| HandshakeError::State {
        step: TransitionStep::ActivateParameters,
        reason: "allocation failed while copying pending into active",
    };
    let mut active = pending.try_clone().map_err(copy_failed)?;
    let other = direction.peer();
    if conn.slot(other) == ParamSlot::Active {
        active.adopt_direction(&conn.active, other).map_err(copy_failed)?;
    }

    Ok(StagedActivation { pending, active })
}

/// Step 4: Finished value for `role` over the transcript so far.
fn compute_finished<F: FinishedGenerator>(conn: &mut Connection<F>, role: Role) -> Result<VerifyData> {
    let transcript_hash = conn.handshake.transcript.current_hash();
    let inputs = FinishedInputs {
        master_secret: conn.master_secret.as_ref(),
        transcript_hash: &transcript_hash,
    };
    conn.finished_generator
        .compute_finished(&inputs, role)
        .map_err(HandshakeError::crypto(TransitionStep::ComputeFinished))
}

/// Installs the staged sets, repoints the direction and records its Finished
/// value. Cannot fail.
fn commit<F>(conn: &mut Connection<F>, staged: StagedActivation, direction: Role, verify_data: VerifyData) {
    conn.pending = staged.pending;
    conn.active = staged.active;
    *conn.slot_mut(direction) = ParamSlot::Active;
    conn.handshake.set_finished(direction, verify_data);
}

/// Receive path: `sender` is the peer whose Change Cipher Spec is read from
/// the handshake I/O buffer.
pub(crate) fn receive<F: FinishedGenerator>(conn: &mut Connection<F>, sender: Role) -> Result<()> {
    let mark = conn.handshake.io.read_cursor();
    let result = receive_steps(conn, sender);
    if result.is_err() {
        conn.handshake.io.rewind_to(mark);
    }
    result
}

fn receive_steps<F: FinishedGenerator>(conn: &mut Connection<F>, sender: Role) -> Result<()> {
    let message = ChangeCipherSpec::read_from(&mut conn.handshake.io)
        .map_err(HandshakeError::io(TransitionStep::ReadMessageType))?;
    if let ChangeCipherSpec::Unknown(byte) = message {
        warn!(?sender, byte, "rejecting unknown change cipher spec message type");
        return Err(HandshakeError::UnknownChangeCipherSpecType(byte));
    }

    let staged = stage_activation(conn, sender)?;
    let verify_data = compute_finished(conn, sender)?;

    commit(conn, staged, sender, verify_data);
    // No partial alert may straddle the epoch boundary.
    conn.alert_in.wipe();
    conn.handshake.next_state = sender.finished_state();

    debug!(
        ?sender,
        next_state = ?conn.handshake.next_state,
        "received change cipher spec, peer direction now active"
    );
    Ok(())
}

/// Send path: the local role `sender` writes its Change Cipher Spec and
/// activates its own write direction, so the Finished record that follows is
/// already protected.
pub(crate) fn send<F: FinishedGenerator>(conn: &mut Connection<F>, sender: Role) -> Result<()> {
    let mark = conn.handshake.io.written();
    let result = send_steps(conn, sender);
    if result.is_err() {
        conn.handshake.io.truncate_written(mark);
    }
    result
}

fn send_steps<F: FinishedGenerator>(conn: &mut Connection<F>, sender: Role) -> Result<()> {
    ChangeCipherSpec::write_to(&mut conn.handshake.io)
        .map_err(HandshakeError::io(TransitionStep::WriteMessageType))?;

    let staged = stage_activation(conn, sender)?;
    let verify_data = compute_finished(conn, sender)?;

    commit(conn, staged, sender, verify_data);
    conn.handshake.next_state = sender.finished_state();

    debug!(
        ?sender,
        next_state = ?conn.handshake.next_state,
        "sent change cipher spec, local direction now active"
    );
    Ok(())
}
