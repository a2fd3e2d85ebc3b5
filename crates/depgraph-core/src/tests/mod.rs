/*! Scenario coverage for the dependence analyses.
 *
 * The inline tests next to each analysis cover its mechanics; the modules
 * here exercise whole-function and whole-module behavior: map totality,
 * skip semantics for ordered accesses, and the fatal consistency paths
 * driven by scripted oracles.
 */

mod data_dependence_tests;
