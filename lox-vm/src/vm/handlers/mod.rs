// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Opcode handlers, organised by category.

pub mod arithmetic;
pub mod control;
pub mod variables;
