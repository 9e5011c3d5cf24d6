/*!
# Introductory Tutorial for Bastos

Start the `bastos` executable in a terminal. When you see `READY.` it is
waiting for a statement. Type CTRL-D to leave and CTRL-C to stop a
running program.

<pre><code>&nbsp;  BASTOS 0.3.0
&nbsp;  READY.
&nbsp;> print "Hello World"
&nbsp;  Hello World
&nbsp;  READY.
</code></pre>

A statement typed without a line number runs at once. This is direct
mode. Put a line number from 1 to 65535 in front of it and the line is
stored instead. Lines are kept in line number order no matter the order
you type them in.

<pre><code>&nbsp;> 20 print "World"
&nbsp;> 10 print "Hello ";
&nbsp;> list
&nbsp;  10 PRINT "Hello ";
&nbsp;  20 PRINT "World"
&nbsp;> run
&nbsp;  Hello World
</code></pre>

Every line is checked when you enter it. A line with a syntax error is
refused and nothing is stored, so a stored program never fails to parse.

<pre><code>&nbsp;> 30 print (1
&nbsp;  ?SYNTAX ERROR
</code></pre>

Typing the same line number again replaces the line. Typing a line
number alone deletes it. Typing a line number then TAB brings the line
back for editing.

Programs are saved with `SAVE "name"` into the directory named by the
`BASTOS_DISK` environment variable, the current directory by default.
`CAT` lists what is there and `LOAD "name"` brings a program back along
with the variables it had when it was saved.

`BASTOS_TERMINAL=videotex` switches `CLS`, `AT`, `INK` and friends from
ANSI escapes to Minitel videotex codes. Set `RUST_LOG=bastos=debug` to
watch the machine work on standard error.
*/
