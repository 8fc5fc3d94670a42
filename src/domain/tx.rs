//! Programmable transaction model.
//!
//! A marketplace action is one transaction built from a short command
//! list: optionally split a payment coin off the gas coin, invoke a
//! contract entry point, optionally route the returned value to the
//! sender. The builder accumulates inputs and commands and hands out
//! `Argument` handles so later commands can reference earlier results,
//! mirroring how the wallet SDK's transaction block works on the wire.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::market::{Address, ObjectId};

/// Transaction construction failure. Programming errors, not chain errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TxBuildError {
    /// Every submitted transaction carries an explicit execution budget.
    #[error("transaction has no gas budget set")]
    MissingGasBudget,
    /// A transaction with no commands would be rejected by the node anyway.
    #[error("transaction has no commands")]
    Empty,
}

/// A transaction input: either an inline literal or an object reference
/// the node resolves at execution time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Input {
    Pure { value: Value },
    Object { object_id: ObjectId },
}

/// Reference to an input or to a prior command's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Argument {
    /// The transaction's gas coin, split-able for payments.
    GasCoin,
    /// Index into the input list.
    Input(u16),
    /// Result of the command at the given index.
    Result(u16),
}

/// A single transaction command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    SplitCoins {
        coin: Argument,
        amounts: Vec<Argument>,
    },
    MoveCall {
        package: ObjectId,
        module: String,
        function: String,
        type_args: Vec<String>,
        args: Vec<Argument>,
    },
    TransferObjects {
        objects: Vec<Argument>,
        recipient: Argument,
    },
}

/// The finished transaction, ready for submission-with-signing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionData {
    pub sender: Address,
    pub inputs: Vec<Input>,
    pub commands: Vec<Command>,
    /// Fixed upper execution budget, never an estimate.
    pub gas_budget: u64,
}

impl TransactionData {
    /// The entry point this transaction invokes, if any.
    ///
    /// Marketplace transactions carry exactly one `MoveCall`; used for
    /// logging and assertions.
    pub fn entry_point(&self) -> Option<&str> {
        self.commands.iter().find_map(|c| match c {
            Command::MoveCall { function, .. } => Some(function.as_str()),
            _ => None,
        })
    }
}

/// Accumulates inputs and commands into a [`TransactionData`].
#[derive(Debug, Default)]
pub struct TransactionBuilder {
    inputs: Vec<Input>,
    commands: Vec<Command>,
    gas_budget: Option<u64>,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an inline literal input.
    pub fn pure<T: Serialize>(&mut self, value: T) -> Argument {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.push_input(Input::Pure { value })
    }

    /// Add an object-reference input.
    pub fn object(&mut self, object_id: impl Into<ObjectId>) -> Argument {
        self.push_input(Input::Object {
            object_id: object_id.into(),
        })
    }

    /// Split `amounts` off a coin; the result references the new coin.
    pub fn split_coins(&mut self, coin: Argument, amounts: Vec<Argument>) -> Argument {
        self.push_command(Command::SplitCoins { coin, amounts })
    }

    /// Invoke a contract entry point; the result references its return value.
    pub fn move_call(
        &mut self,
        package: impl Into<ObjectId>,
        module: impl Into<String>,
        function: impl Into<String>,
        type_args: Vec<String>,
        args: Vec<Argument>,
    ) -> Argument {
        self.push_command(Command::MoveCall {
            package: package.into(),
            module: module.into(),
            function: function.into(),
            type_args,
            args,
        })
    }

    /// Transfer values produced earlier in the transaction.
    pub fn transfer_objects(&mut self, objects: Vec<Argument>, recipient: Argument) {
        self.push_command(Command::TransferObjects { objects, recipient });
    }

    /// Set the fixed execution budget. Mandatory before [`finish`].
    ///
    /// [`finish`]: TransactionBuilder::finish
    pub fn set_gas_budget(&mut self, budget: u64) {
        self.gas_budget = Some(budget);
    }

    /// Seal the transaction for the given sender.
    pub fn finish(self, sender: impl Into<Address>) -> Result<TransactionData, TxBuildError> {
        if self.commands.is_empty() {
            return Err(TxBuildError::Empty);
        }
        let gas_budget = self.gas_budget.ok_or(TxBuildError::MissingGasBudget)?;
        Ok(TransactionData {
            sender: sender.into(),
            inputs: self.inputs,
            commands: self.commands,
            gas_budget,
        })
    }

    fn push_input(&mut self, input: Input) -> Argument {
        let index = self.inputs.len() as u16;
        self.inputs.push(input);
        Argument::Input(index)
    }

    fn push_command(&mut self, command: Command) -> Argument {
        let index = self.commands.len() as u16;
        self.commands.push(command);
        Argument::Result(index)
    }
}
